//! pj-storage - Storage library for pandajeon
//!
//! This crate provides a file system implementation of the forest store,
//! plus the feed file that lists posts.

mod forest_store;

pub use forest_store::FileForestStore;
