//! Comment builder for fluent API

use super::model::CommentNode;
use crate::error::{PandajeonError, Result};
use crate::types::CommentId;

/// Builder for creating comment nodes with fluent API
#[derive(Debug, Clone, Default)]
pub struct CommentBuilder {
    content: Option<String>,
    author: String,
    time_label: String,
    like_count: u32,
    liked_by_viewer: bool,
    children: Vec<CommentNode>,
}

impl CommentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the display time label
    pub fn time_label(mut self, label: impl Into<String>) -> Self {
        self.time_label = label.into();
        self
    }

    /// Start with an existing like count (viewer has not liked it)
    pub fn likes(mut self, count: u32) -> Self {
        self.like_count = count;
        self
    }

    /// Mark as liked by the viewer; the count must already include that like
    pub fn liked(mut self, liked: bool) -> Self {
        self.liked_by_viewer = liked;
        self
    }

    /// Append a reply
    pub fn reply(mut self, reply: CommentNode) -> Self {
        self.children.push(reply);
        self
    }

    /// Build the node
    pub fn build(self, id: CommentId) -> Result<CommentNode> {
        let content = self.content.ok_or(PandajeonError::EmptyContent)?;

        if content.is_empty() {
            return Err(PandajeonError::EmptyContent);
        }

        if self.liked_by_viewer && self.like_count == 0 {
            return Err(PandajeonError::Validation(
                "A liked comment must have at least one like".to_string(),
            ));
        }

        Ok(CommentNode {
            id,
            author: self.author,
            content,
            created_label: self.time_label,
            like_count: self.like_count,
            liked_by_viewer: self.liked_by_viewer,
            children: self.children,
        })
    }
}
