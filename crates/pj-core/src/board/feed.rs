//! The post feed

use super::model::{NewPost, Post};
use crate::comment::{CommentEngine, CommentForest};
use crate::config::{BoardConfig, Config};
use crate::error::{PandajeonError, Result};
use crate::types::{CommentId, IdAllocator, PostId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Posts newest first, plus the engine used for their comments
#[derive(Debug, Clone)]
pub struct Board {
    posts: Vec<Post>,
    engine: CommentEngine,
    config: BoardConfig,
}

/// One page of the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    /// Zero-based page index
    pub index: usize,
    /// Posts on this page, newest first
    pub posts: Vec<Post>,
    /// Whether another page follows
    pub has_more: bool,
}

impl Board {
    /// Create an empty board
    pub fn new(config: &Config) -> Self {
        Self {
            posts: Vec::new(),
            engine: CommentEngine::from_config(&config.engine),
            config: config.board.clone(),
        }
    }

    /// Create a board from posts already in newest-first order
    pub fn with_posts(config: &Config, posts: Vec<Post>) -> Result<Self> {
        for post in &posts {
            post.comments
                .validate()
                .map_err(|e| e.with_context(format!("Post {}", post.id)))?;
        }
        let mut board = Self::new(config);
        board.posts = posts;
        Ok(board)
    }

    /// All posts, newest first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Get a post by ID
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PostId) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PandajeonError::PostNotFound(id))
    }

    /// Publish a post at the top of the feed
    pub fn submit_post(&mut self, draft: NewPost, ids: &mut dyn IdAllocator) -> Result<PostId> {
        if draft.title.is_empty() || draft.content.is_empty() {
            return Err(PandajeonError::Validation(
                "Post title and content are required".to_string(),
            ));
        }

        let id = PostId(ids.allocate());
        if self.get(id).is_some() {
            return Err(PandajeonError::Validation(format!(
                "Post with ID {} already exists",
                id
            )));
        }

        let sub = match draft.sub.trim() {
            "" => self.config.default_sub.clone(),
            sub => sub.to_string(),
        };

        self.posts.insert(
            0,
            Post {
                id,
                sub,
                title: draft.title,
                content: draft.content,
                image: draft.image,
                author: draft.author,
                likes: 0,
                is_liked: false,
                comments: CommentForest::new(),
                time: self.config.just_now_label.clone(),
            },
        );

        debug!(post = %id, "Submitted post");
        Ok(id)
    }

    /// Flip the viewer's like on a post
    pub fn toggle_post_like(&mut self, id: PostId) -> Result<()> {
        let post = self.get_mut(id)?;
        post.toggle_like();
        Ok(())
    }

    /// Add a comment or reply to a post, stamped with the "just now" label.
    ///
    /// Returns `Ok(None)` when the engine leaves the forest unchanged.
    pub fn add_comment(
        &mut self,
        post_id: PostId,
        content: &str,
        author: &str,
        parent: Option<CommentId>,
        ids: &mut dyn IdAllocator,
    ) -> Result<Option<CommentId>> {
        let label = self.config.just_now_label.clone();
        let engine = self.engine.clone();
        let post = self.get_mut(post_id)?;

        match engine.try_insert_comment(&post.comments, content, author, &label, parent, ids) {
            Ok((forest, id)) => {
                post.comments = forest;
                Ok(Some(id))
            }
            Err(err) if err.is_no_op() => {
                debug!(post = %post_id, error = %err, "Comment not added");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Flip the viewer's like on a comment or reply of a post.
    ///
    /// Returns whether a comment was found.
    pub fn toggle_comment_like(&mut self, post_id: PostId, comment_id: CommentId) -> Result<bool> {
        let engine = self.engine.clone();
        let post = self.get_mut(post_id)?;
        let before = post.comments.clone();
        post.comments = engine.toggle_like(&before, comment_id);
        Ok(post.comments != before)
    }

    /// The "all" label followed by each distinct sub, in feed order
    pub fn subs(&self) -> Vec<String> {
        let mut subs = vec![self.config.all_label.clone()];
        for post in &self.posts {
            if !subs.contains(&post.sub) {
                subs.push(post.sub.clone());
            }
        }
        subs
    }

    /// Posts in a sub; the "all" label selects everything
    pub fn filter(&self, sub: &str) -> Vec<&Post> {
        if sub == self.config.all_label {
            return self.posts.iter().collect();
        }
        self.posts.iter().filter(|p| p.sub == sub).collect()
    }

    /// One page of the feed, newest first
    pub fn page(&self, index: usize) -> FeedPage {
        let size = self.config.page_size.max(1);
        let start = index.saturating_mul(size).min(self.posts.len());
        let end = start.saturating_add(size).min(self.posts.len());
        FeedPage {
            index,
            posts: self.posts[start..end].to_vec(),
            has_more: end < self.posts.len(),
        }
    }

    /// Largest post id on the board
    pub fn max_post_id(&self) -> Option<PostId> {
        self.posts.iter().map(|p| p.id).max()
    }

    /// Get total post count
    pub fn count(&self) -> usize {
        self.posts.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
