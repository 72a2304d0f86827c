//! Core type definitions for pandajeon

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a comment or reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl From<u64> for CommentId {
    fn from(raw: u64) -> Self {
        CommentId(raw)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl From<u64> for PostId {
    fn from(raw: u64) -> Self {
        PostId(raw)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh ids, supplied by the host.
///
/// The engine never makes up ids itself. Uniqueness across processes is the
/// allocator's business; within one forest the engine rejects collisions.
pub trait IdAllocator {
    /// Hand out the next id
    fn allocate(&mut self) -> u64;
}

/// Monotonic counter
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting at `start`
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Start one past the largest id already in the forest
    pub fn after(forest: &crate::comment::CommentForest) -> Self {
        let next = forest.max_id().map(|id| id.0 + 1).unwrap_or(1);
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator for SequentialIds {
    fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Wall-clock millisecond ids, strictly increasing within a process
#[derive(Debug, Clone, Default)]
pub struct ClockIds {
    last: u64,
}

impl ClockIds {
    /// Create a new clock allocator
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for ClockIds {
    fn allocate(&mut self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        // Same millisecond (or a clock step backwards): bump past the last id.
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last
    }
}

impl<A: IdAllocator + ?Sized> IdAllocator for &mut A {
    fn allocate(&mut self) -> u64 {
        (**self).allocate()
    }
}
