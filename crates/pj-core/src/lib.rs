//! pj-core - Core library for pandajeon
//!
//! This crate provides the comment tree engine behind the pandajeon board:
//! the nested comment model, the pure insert and like operations over it,
//! the post feed that hosts those trees, and the storage seam a host uses
//! to persist forests safely.

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod board;
pub mod store;
pub mod snapshot;

pub use error::{PandajeonError, Result};
pub use types::*;
