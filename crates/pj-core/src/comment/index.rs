//! Flat id index over a comment forest

use super::model::{CommentForest, CommentNode};
use crate::error::{PandajeonError, Result};
use crate::types::CommentId;
use std::collections::HashSet;

/// Every id in a forest, checked for uniqueness at build time
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    ids: HashSet<CommentId>,
}

impl CommentIndex {
    /// Index a forest, failing on the first id seen twice
    pub fn build(forest: &CommentForest) -> Result<Self> {
        let mut ids = HashSet::with_capacity(forest.total_count());
        let mut stack: Vec<&CommentNode> = forest.roots().iter().collect();

        while let Some(node) = stack.pop() {
            if !ids.insert(node.id) {
                return Err(PandajeonError::DuplicateId(node.id));
            }
            stack.extend(node.children.iter());
        }

        Ok(Self { ids })
    }

    /// Check if an id is present at any depth
    pub fn contains(&self, id: CommentId) -> bool {
        self.ids.contains(&id)
    }
}
