//! File system storage for the feed and comment forests

use pj_core::board::{Board, Post};
use pj_core::comment::CommentForest;
use pj_core::config::Config;
use pj_core::error::{PandajeonError, Result};
use pj_core::snapshot::{FeedFile, ForestFile, ForestMigrator, CURRENT_SCHEMA_VERSION};
use pj_core::store::{ForestStore, Versioned};
use pj_core::types::PostId;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// File system based storage: `feed.json` lists the posts, and each post's
/// comment forest lives in `posts/<id>.json`.
///
/// Version checks and feed updates are serialized within this process only.
// TODO: take an advisory lock on the post file so two processes cannot
// interleave the version check and the rename.
pub struct FileForestStore {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Posts subdirectory
    posts_dir: PathBuf,
    /// Serializes compare-and-swap within the process
    write_lock: Mutex<()>,
}

impl FileForestStore {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let posts_dir = base_dir.join("posts");

        let storage = Self {
            base_dir,
            posts_dir,
            write_lock: Mutex::new(()),
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage in the platform data directory (~/.pandajeon as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// Platform data directory used by [`FileForestStore::default_location`]
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "pandajeon", "pandajeon")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".pandajeon")
            })
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.posts_dir.exists() {
            fs::create_dir_all(&self.posts_dir).map_err(|e| {
                PandajeonError::from(e).with_context("Failed to create posts directory")
            })?;
            debug!("Created posts directory: {:?}", self.posts_dir);
        }
        Ok(())
    }

    /// Get the path for a post's forest file
    fn forest_path(&self, post: PostId) -> PathBuf {
        self.posts_dir.join(format!("{}.json", post))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, post: PostId) -> PathBuf {
        self.posts_dir.join(format!(".{}.json.tmp", post))
    }

    /// Get the path of the feed file
    fn feed_path(&self) -> PathBuf {
        self.base_dir.join("feed.json")
    }

    /// Write JSON atomically (write to temp, then rename)
    fn atomic_write<T: Serialize>(&self, value: &T, temp_path: &Path, final_path: &Path) -> Result<()> {
        let temp_file = fs::File::create(temp_path)
            .map_err(|e| PandajeonError::from(e).with_context("Failed to create temp file"))?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;

        fs::rename(temp_path, final_path).map_err(|e| {
            let _ = fs::remove_file(temp_path);
            PandajeonError::from(e).with_context("Failed to rename temp file")
        })
    }

    /// Read and migrate the feed file; a missing feed is empty
    fn read_feed(&self) -> Result<Vec<Post>> {
        let path = self.feed_path();
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let feed: FeedFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PandajeonError::from(e).with_context(format!("Corrupt feed file {}", path.display())))?;
        Ok(ForestMigrator::migrate_feed(feed)?.posts)
    }

    /// Read, migrate and validate a forest file
    fn read_file(&self, path: &Path) -> Result<Option<ForestFile>> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let forest_file: ForestFile = serde_json::from_reader(BufReader::new(file))?;

        let migrated = if ForestMigrator::needs_migration(&forest_file) {
            info!(
                "Migrating forest file from version {} to {}",
                forest_file.schema_version, CURRENT_SCHEMA_VERSION
            );
            ForestMigrator::migrate(forest_file)?
        } else {
            forest_file
        };

        migrated
            .forest
            .validate()
            .map_err(|e| e.with_context(format!("Corrupt forest file {}", path.display())))?;

        Ok(Some(migrated))
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get posts directory
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Check if a post has a stored forest
    pub fn exists(&self, post: PostId) -> bool {
        self.forest_path(post).exists()
    }

    /// Posts in the feed, newest first, without their comments
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        self.read_feed()
    }

    /// Check whether the feed lists a post
    pub fn contains_post(&self, post: PostId) -> Result<bool> {
        Ok(self.read_feed()?.iter().any(|p| p.id == post))
    }

    /// The whole board, each post carrying its stored comment forest
    pub fn load_board(&self, config: &Config) -> Result<Board> {
        let mut posts = self.read_feed()?;
        for post in &mut posts {
            post.comments = self.load(post.id)?.value;
        }
        Board::with_posts(config, posts)
    }

    /// Run `update` against the feed and write it back.
    ///
    /// The board handed to `update` has no comments; comment changes go
    /// through [`ForestStore`] instead.
    pub fn update_feed<T>(
        &self,
        config: &Config,
        update: impl FnOnce(&mut Board) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut board = Board::with_posts(config, self.read_feed()?)?;
        let result = update(&mut board)?;

        let temp_path = self.base_dir.join(".feed.json.tmp");
        self.atomic_write(&FeedFile::new(board.posts()), &temp_path, &self.feed_path())?;
        debug!(posts = board.count(), "Saved feed");
        Ok(result)
    }
}

impl ForestStore for FileForestStore {
    fn load(&self, post: PostId) -> Result<Versioned<CommentForest>> {
        Ok(self
            .read_file(&self.forest_path(post))?
            .map(|file| Versioned {
                version: file.version,
                value: file.forest,
            })
            .unwrap_or_default())
    }

    fn compare_and_swap(
        &self,
        post: PostId,
        expected_version: u64,
        forest: &CommentForest,
    ) -> Result<u64> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let found = self
            .read_file(&self.forest_path(post))?
            .map(|file| file.version)
            .unwrap_or(0);
        if found != expected_version {
            return Err(PandajeonError::VersionConflict {
                expected: expected_version,
                found,
            });
        }

        let file = ForestFile::new(post, expected_version + 1, forest.clone());
        self.atomic_write(&file, &self.temp_path(post), &self.forest_path(post))?;
        debug!("Saved post {} forest v{}", post, file.version);
        Ok(file.version)
    }
}
