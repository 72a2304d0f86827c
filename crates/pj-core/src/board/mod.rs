//! Board module
//!
//! The feed of posts grouped into sub-communities. Each post carries its own
//! comment forest, which is only ever changed through the comment engine.

mod feed;
mod model;

pub use feed::{Board, FeedPage};
pub use model::{NewPost, Post};
