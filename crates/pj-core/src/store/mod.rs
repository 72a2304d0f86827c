//! Host-side storage for comment forests
//!
//! The engine is pure and knows nothing about storage. A host that keeps
//! forests somewhere shared runs read, apply, write cycles against a
//! [`ForestStore`]; every write carries the version it read, so a racing
//! writer shows up as [`PandajeonError::VersionConflict`] instead of a lost
//! update. [`apply_with_retry`] wraps that cycle.

mod memory;

pub use memory::MemoryForestStore;

use crate::comment::CommentForest;
use crate::error::{PandajeonError, Result};
use crate::types::PostId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A value together with the version it was read at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Number of successful writes so far; 0 for never written
    pub version: u64,
    /// The stored value
    pub value: T,
}

/// Trait for forest storage implementations
pub trait ForestStore: Send + Sync {
    /// Load a post's forest; a post never written loads as empty at version 0
    fn load(&self, post: PostId) -> Result<Versioned<CommentForest>>;

    /// Replace a post's forest if it is still at `expected_version`.
    ///
    /// Returns the new version.
    fn compare_and_swap(
        &self,
        post: PostId,
        expected_version: u64,
        forest: &CommentForest,
    ) -> Result<u64>;
}

/// Run a read, apply, write cycle, retrying on version conflicts.
///
/// `op` must be a pure forest transformation; it may run more than once.
/// When it returns a forest equal to the one read, nothing is written and
/// the stored version is returned unchanged.
pub fn apply_with_retry<F>(
    store: &dyn ForestStore,
    post: PostId,
    max_retries: u32,
    mut op: F,
) -> Result<Versioned<CommentForest>>
where
    F: FnMut(&CommentForest) -> Result<CommentForest>,
{
    let mut attempt = 0;
    loop {
        let current = store.load(post)?;
        let next = op(&current.value)?;

        if next == current.value {
            debug!(post = %post, version = current.version, "Nothing to write");
            return Ok(current);
        }

        match store.compare_and_swap(post, current.version, &next) {
            Ok(version) => {
                debug!(post = %post, version, "Stored forest");
                return Ok(Versioned { version, value: next });
            }
            Err(PandajeonError::VersionConflict { expected, found }) if attempt < max_retries => {
                attempt += 1;
                info!(
                    post = %post,
                    expected,
                    found,
                    attempt,
                    "Forest changed underneath us, retrying"
                );
            }
            Err(err) => return Err(err),
        }
    }
}
