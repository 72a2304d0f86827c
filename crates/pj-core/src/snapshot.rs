//! Forest and feed file formats and schema migration

use crate::board::Post;
use crate::comment::CommentForest;
use crate::error::{PandajeonError, Result};
use crate::types::PostId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Parsed `major.minor` schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Parse "major.minor"
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    /// Check if this version is compatible with another version
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A persisted forest with its store version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestFile {
    /// Schema version for migration
    pub schema_version: String,
    /// Post the forest belongs to
    pub post: PostId,
    /// Store version, bumped on every write
    pub version: u64,
    /// When the file was written
    pub saved_at: DateTime<Utc>,
    /// The comments
    pub forest: CommentForest,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ForestFile {
    /// Create a new file with the current schema version
    pub fn new(post: PostId, version: u64, forest: CommentForest) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            post,
            version,
            saved_at: Utc::now(),
            forest,
            extra: HashMap::new(),
        }
    }

    /// Parse schema version
    pub fn parse_version(&self) -> Option<SchemaVersion> {
        SchemaVersion::parse(&self.schema_version)
    }
}

/// The persisted feed: post metadata, newest first.
///
/// Comments are not part of this file; each post's forest lives in its own
/// [`ForestFile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedFile {
    /// Schema version for migration
    pub schema_version: String,
    /// When the file was written
    pub saved_at: DateTime<Utc>,
    /// Posts with their comment forests left empty
    pub posts: Vec<Post>,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl FeedFile {
    /// Create a feed file, dropping the comments carried by `posts`
    pub fn new(posts: &[Post]) -> Self {
        let posts = posts
            .iter()
            .map(|post| Post {
                comments: CommentForest::new(),
                ..post.clone()
            })
            .collect();

        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            posts,
            extra: HashMap::new(),
        }
    }
}

/// Schema migrator for forest and feed files
pub struct ForestMigrator;

impl ForestMigrator {
    /// Migrate a forest file to the current schema version
    pub fn migrate(mut file: ForestFile) -> Result<ForestFile> {
        file.schema_version = Self::migrate_version(&file.schema_version)?;
        Ok(file)
    }

    /// Migrate a feed file to the current schema version
    pub fn migrate_feed(mut file: FeedFile) -> Result<FeedFile> {
        file.schema_version = Self::migrate_version(&file.schema_version)?;
        Ok(file)
    }

    fn migrate_version(schema_version: &str) -> Result<String> {
        let version = SchemaVersion::parse(schema_version).ok_or_else(|| {
            PandajeonError::UnsupportedSchemaVersion(schema_version.to_string())
        })?;

        let current = SchemaVersion::V1_0;
        if !version.is_compatible(&current) {
            return Err(PandajeonError::UnsupportedSchemaVersion(format!(
                "{} (expected {}.x)",
                schema_version, current.major
            )));
        }

        // Every 1.x layout reads as 1.0; only the stamp changes.
        Ok(CURRENT_SCHEMA_VERSION.to_string())
    }

    /// Check if a file needs migration
    pub fn needs_migration(file: &ForestFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }
}
