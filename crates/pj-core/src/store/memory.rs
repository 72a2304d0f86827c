//! In-memory forest store

use super::{ForestStore, Versioned};
use crate::comment::CommentForest;
use crate::error::{PandajeonError, Result};
use crate::types::PostId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory forest storage, shared between threads
#[derive(Debug, Default)]
pub struct MemoryForestStore {
    forests: RwLock<HashMap<PostId, Versioned<CommentForest>>>,
}

impl MemoryForestStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForestStore for MemoryForestStore {
    fn load(&self, post: PostId) -> Result<Versioned<CommentForest>> {
        let forests = self.forests.read().unwrap_or_else(PoisonError::into_inner);
        Ok(forests.get(&post).cloned().unwrap_or_default())
    }

    fn compare_and_swap(
        &self,
        post: PostId,
        expected_version: u64,
        forest: &CommentForest,
    ) -> Result<u64> {
        let mut forests = self.forests.write().unwrap_or_else(PoisonError::into_inner);
        let entry = forests.entry(post).or_default();

        if entry.version != expected_version {
            return Err(PandajeonError::VersionConflict {
                expected: expected_version,
                found: entry.version,
            });
        }

        entry.version += 1;
        entry.value = forest.clone();
        Ok(entry.version)
    }
}
