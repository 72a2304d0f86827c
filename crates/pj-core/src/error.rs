//! Error types for pandajeon

use crate::types::{CommentId, PostId};
use thiserror::Error;

/// Main error type for pandajeon
#[derive(Debug, Error)]
pub enum PandajeonError {
    /// Insert attempted with no content
    #[error("Comment content cannot be empty")]
    EmptyContent,

    /// Content longer than the configured maximum
    #[error("Comment content exceeds maximum length of {max} characters")]
    ContentTooLong { max: usize },

    /// Parent or like target does not match any node in the forest
    #[error("Comment not found: {0}")]
    TargetNotFound(CommentId),

    /// Reply would be nested deeper than the configured limit
    #[error("Reply depth {depth} exceeds limit of {max}")]
    DepthLimitExceeded { depth: usize, max: usize },

    /// Id already present somewhere in the forest
    #[error("Duplicate comment id: {0}")]
    DuplicateId(CommentId),

    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Stored forest changed between read and write
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PandajeonError>,
    },
}

impl PandajeonError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PandajeonError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error is one of the conditions the engine treats as a no-op
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            PandajeonError::EmptyContent
                | PandajeonError::ContentTooLong { .. }
                | PandajeonError::TargetNotFound(_)
                | PandajeonError::DepthLimitExceeded { .. }
                | PandajeonError::DuplicateId(_)
        )
    }
}

impl From<toml::de::Error> for PandajeonError {
    fn from(err: toml::de::Error) -> Self {
        PandajeonError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for PandajeonError {
    fn from(err: toml::ser::Error) -> Self {
        PandajeonError::Toml(err.to_string())
    }
}

/// Result type alias for pandajeon
pub type Result<T> = std::result::Result<T, PandajeonError>;
