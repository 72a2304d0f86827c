//! Post data models

use crate::comment::CommentForest;
use crate::types::PostId;
use serde::{Deserialize, Serialize};

/// A post in the feed, together with its comment tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier
    pub id: PostId,
    /// Sub-community the post belongs to
    pub sub: String,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Attached image, as a URL or data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Display name of the author
    pub author: String,
    /// Number of likes
    pub likes: u32,
    /// Whether the current viewer liked this post
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    /// Comments on the post
    #[serde(default)]
    pub comments: CommentForest,
    /// Display-only creation marker
    pub time: String,
}

impl Post {
    /// Flip the like flag, moving the count in lockstep
    pub fn toggle_like(&mut self) {
        self.is_liked = !self.is_liked;
        if self.is_liked {
            self.likes = self.likes.saturating_add(1);
        } else {
            self.likes = self.likes.saturating_sub(1);
        }
    }

    /// Number of top-level comments, as shown next to the comment button
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Input for a new post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    /// Sub-community; blank falls back to the configured default
    #[serde(default)]
    pub sub: String,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Attached image
    #[serde(default)]
    pub image: Option<String>,
    /// Display name of the author
    pub author: String,
}

impl NewPost {
    /// Create a post draft
    pub fn new(
        sub: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            title: title.into(),
            content: content.into(),
            image: None,
            author: author.into(),
        }
    }

    /// Attach an image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
