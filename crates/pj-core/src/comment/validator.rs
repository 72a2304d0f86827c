//! Comment validation

use crate::config::{EngineConfig, ReplyDepth};
use crate::error::{PandajeonError, Result};

/// Validator for new comments
///
/// Only empty content is rejected by default. A length cap and a reply
/// depth limit are opt-in.
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: Option<usize>,
    reply_depth: ReplyDepth,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: None,
            reply_depth: ReplyDepth::Unbounded,
        }
    }

    /// Create a validator from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_length: config.max_content_length,
            reply_depth: config.reply_depth,
        }
    }

    /// Cap content at `max_length` characters
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Create a new validator with a reply depth rule
    pub fn with_reply_depth(mut self, reply_depth: ReplyDepth) -> Self {
        self.reply_depth = reply_depth;
        self
    }

    /// Reply depth rule in force
    pub fn reply_depth(&self) -> ReplyDepth {
        self.reply_depth
    }

    /// Validate comment content
    pub fn validate_content(&self, content: &str) -> Result<()> {
        if content.is_empty() {
            return Err(PandajeonError::EmptyContent);
        }

        if let Some(max) = self.max_length {
            if content.chars().count() > max {
                return Err(PandajeonError::ContentTooLong { max });
            }
        }

        Ok(())
    }

    /// Validate that a reply may hang below a parent at `parent_depth`
    pub fn validate_depth(&self, parent_depth: usize) -> Result<()> {
        let depth = parent_depth + 1;
        match self.reply_depth {
            ReplyDepth::Limited(max) if !self.reply_depth.allows(depth) => {
                Err(PandajeonError::DepthLimitExceeded { depth, max })
            }
            _ => Ok(()),
        }
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_valid() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content("거기 차슈 추가 필수").is_ok());
    }

    #[test]
    fn test_validate_content_empty() {
        let validator = CommentValidator::new();
        assert!(matches!(
            validator.validate_content(""),
            Err(PandajeonError::EmptyContent)
        ));
    }

    #[test]
    fn test_validate_content_whitespace_is_content() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content("   ").is_ok());
        assert!(validator.validate_content("\n").is_ok());
    }

    #[test]
    fn test_validate_content_uncapped_by_default() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content(&"가".repeat(50_000)).is_ok());
    }

    #[test]
    fn test_validate_content_too_long() {
        let validator = CommentValidator::new().with_max_length(5);
        assert!(validator.validate_content("라멘 최고").is_ok());
        assert!(matches!(
            validator.validate_content("This is too long"),
            Err(PandajeonError::ContentTooLong { max: 5 })
        ));
    }

    #[test]
    fn test_validate_depth_unbounded() {
        let validator = CommentValidator::new();
        assert!(validator.validate_depth(0).is_ok());
        assert!(validator.validate_depth(40).is_ok());
    }

    #[test]
    fn test_validate_depth_two_tier() {
        let validator = CommentValidator::new().with_reply_depth(ReplyDepth::TWO_TIER);
        assert!(validator.validate_depth(0).is_ok());
        assert!(matches!(
            validator.validate_depth(1),
            Err(PandajeonError::DepthLimitExceeded { depth: 2, max: 1 })
        ));
    }
}
