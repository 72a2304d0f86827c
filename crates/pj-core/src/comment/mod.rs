//! Comment system module
//!
//! The comment tree attached to each post: the node and forest model, the
//! engine that inserts and likes nodes, plus indexing and validation.

pub mod model;
pub mod engine;
pub mod index;
pub mod validator;
pub mod builder;

pub use model::*;
pub use engine::{insert_comment, toggle_like, CommentCommand, CommentEngine};
pub use index::CommentIndex;
pub use validator::CommentValidator;
pub use builder::CommentBuilder;
