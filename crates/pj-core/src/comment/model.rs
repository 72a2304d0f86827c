//! Comment data models

use super::index::CommentIndex;
use crate::error::Result;
use crate::types::CommentId;
use serde::{Deserialize, Serialize};

/// A comment or reply on a post.
///
/// Field names on the wire match the nested records the board persists in its
/// comments column, so a forest can be stored and reloaded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    /// Unique comment identifier
    pub id: CommentId,
    /// Display name of the creator
    pub author: String,
    /// Comment text
    pub content: String,
    /// Display-only creation marker, e.g. "3분 전"
    #[serde(rename = "time")]
    pub created_label: String,
    /// Number of likes
    #[serde(rename = "likes")]
    pub like_count: u32,
    /// Whether the current viewer liked this comment
    #[serde(rename = "isLiked")]
    pub liked_by_viewer: bool,
    /// Direct replies, oldest first
    #[serde(rename = "replies", default)]
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Create a fresh node with no likes and no replies
    pub fn new(
        id: CommentId,
        author: impl Into<String>,
        content: impl Into<String>,
        created_label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            content: content.into(),
            created_label: created_label.into(),
            like_count: 0,
            liked_by_viewer: false,
            children: Vec::new(),
        }
    }

    /// Flip the like flag, moving the count in lockstep
    pub fn toggle_like(&mut self) {
        self.liked_by_viewer = !self.liked_by_viewer;
        if self.liked_by_viewer {
            self.like_count = self.like_count.saturating_add(1);
        } else {
            self.like_count = self.like_count.saturating_sub(1);
        }
    }

    /// Check if this node has no replies
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one, at any depth
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// All top-level comments on one post, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentForest {
    roots: Vec<CommentNode>,
}

impl CommentForest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level comments
    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    /// Number of top-level comments
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Check if there are no comments at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes at every depth
    pub fn total_count(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.descendant_count()).sum()
    }

    /// Find a node anywhere in the forest
    pub fn get(&self, id: CommentId) -> Option<&CommentNode> {
        self.walk().find(|(_, node)| node.id == id).map(|(_, node)| node)
    }

    /// Check if a node with this id exists at any depth
    pub fn contains(&self, id: CommentId) -> bool {
        self.get(id).is_some()
    }

    /// Depth of a node (roots are 0)
    pub fn depth_of(&self, id: CommentId) -> Option<usize> {
        self.walk().find(|(_, node)| node.id == id).map(|(depth, _)| depth)
    }

    /// Largest id in the forest
    pub fn max_id(&self) -> Option<CommentId> {
        self.walk().map(|(_, node)| node.id).max()
    }

    /// Depth-first, pre-order walk yielding `(depth, node)`
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Check that every id is unique across the whole forest
    pub fn validate(&self) -> Result<()> {
        CommentIndex::build(self).map(|_| ())
    }

    pub(crate) fn roots_mut(&mut self) -> &mut Vec<CommentNode> {
        &mut self.roots
    }
}

impl From<Vec<CommentNode>> for CommentForest {
    fn from(roots: Vec<CommentNode>) -> Self {
        Self { roots }
    }
}

/// Pre-order iterator over a forest
pub struct Walk<'a> {
    stack: Vec<(usize, &'a CommentNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a CommentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
