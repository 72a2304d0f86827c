//! Configuration management for pandajeon

use crate::error::{PandajeonError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment engine settings
    pub engine: EngineConfig,
    /// Feed settings
    pub board: BoardConfig,
    /// Host store settings
    pub store: StoreConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PandajeonError::from(e).with_context(format!("Reading {}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_content_length == Some(0) {
            return Err(PandajeonError::Config(
                "engine.max_content_length must be greater than zero".to_string(),
            ));
        }
        if self.board.page_size == 0 {
            return Err(PandajeonError::Config(
                "board.page_size must be greater than zero".to_string(),
            ));
        }
        if self.board.all_label.trim().is_empty() {
            return Err(PandajeonError::Config(
                "board.all_label cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How deep replies may nest below a top-level comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyDepth {
    /// Any depth
    Unbounded,
    /// Replies may sit at most this many levels below a root
    Limited(usize),
}

impl ReplyDepth {
    /// Top-level comment plus a single reply tier
    pub const TWO_TIER: Self = ReplyDepth::Limited(1);

    /// Check whether a node may be placed at `depth` (roots are depth 0)
    pub fn allows(&self, depth: usize) -> bool {
        match self {
            ReplyDepth::Unbounded => true,
            ReplyDepth::Limited(max) => depth <= *max,
        }
    }
}

impl Default for ReplyDepth {
    fn default() -> Self {
        ReplyDepth::Unbounded
    }
}

/// Comment engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reply nesting rule
    pub reply_depth: ReplyDepth,
    /// Maximum comment content length in characters, uncapped when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_content_length: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reply_depth: ReplyDepth::Unbounded,
            max_content_length: None,
        }
    }
}

/// Feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Posts per page
    pub page_size: usize,
    /// Pseudo-sub that selects every post
    pub all_label: String,
    /// Sub used when a post is submitted without one
    pub default_sub: String,
    /// Label stamped on freshly created posts and comments
    pub just_now_label: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            all_label: "전체".to_string(),
            default_sub: "자유".to_string(),
            just_now_label: "방금 전".to_string(),
        }
    }
}

/// Host store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Read-apply-write attempts after the first before giving up
    pub max_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.reply_depth, ReplyDepth::Unbounded);
        assert_eq!(config.board.page_size, 20);
        assert_eq!(config.board.all_label, "전체");
        assert_eq!(config.store.max_retries, 3);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml_string().unwrap();
        assert!(toml.contains("[engine]"));
        assert!(toml.contains("[board]"));

        let config2 = Config::from_toml_str(&toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [engine]
            reply_depth = { limited = 1 }

            [board]
            page_size = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.reply_depth, ReplyDepth::TWO_TIER);
        assert_eq!(config.engine.max_content_length, None);
        assert_eq!(config.board.page_size, 5);
        assert_eq!(config.board.default_sub, "자유");
    }

    #[test]
    fn test_content_cap_from_toml() {
        let config = Config::from_toml_str("[engine]\nmax_content_length = 500\n").unwrap();
        assert_eq!(config.engine.max_content_length, Some(500));
        assert!(config.to_toml_string().unwrap().contains("max_content_length = 500"));
    }

    #[test]
    fn test_unbounded_from_toml() {
        let config = Config::from_toml_str("[engine]\nreply_depth = \"unbounded\"\n").unwrap();
        assert_eq!(config.engine.reply_depth, ReplyDepth::Unbounded);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Config::from_toml_str("[board]\npage_size = 0\n").is_err());
        assert!(Config::from_toml_str("[engine]\nmax_content_length = 0\n").is_err());
        assert!(Config::from_toml_str("not = [valid").is_err());
    }

    #[test]
    fn test_reply_depth_allows() {
        assert!(ReplyDepth::Unbounded.allows(50));
        assert!(ReplyDepth::TWO_TIER.allows(0));
        assert!(ReplyDepth::TWO_TIER.allows(1));
        assert!(!ReplyDepth::TWO_TIER.allows(2));
    }
}
