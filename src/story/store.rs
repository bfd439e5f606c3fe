//! Filesystem store for split stories.
//!
//! Layout: `{root}/{key}/story-1.txt`, `story-2.txt`, `story-3.txt`.
//! A story becomes visible only once all three files are written: they go
//! into `{root}/.{key}.partial` first and the directory is renamed into place.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::ids::StorageKey;
use super::splitter::StoryParts;

/// Errors raised while persisting a story.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        /// Path the failing operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The location for a fresh key is already taken.
    #[error("story location already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Convenience result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// File name of the `index`-th part (1-based).
#[must_use]
pub fn part_file_name(index: usize) -> String {
    format!("story-{index}.txt")
}

/// Writes stories under a root directory.
#[derive(Clone, Debug)]
pub struct StoryStore {
    root: PathBuf,
}

impl StoryStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Final directory of the story stored under `key`.
    #[must_use]
    pub fn location(&self, key: StorageKey) -> PathBuf {
        self.root.join(key.dir_name())
    }

    fn staging_location(&self, key: StorageKey) -> PathBuf {
        self.root.join(format!(".{}.partial", key.dir_name()))
    }

    /// Persist `parts` under `key` and return the story directory.
    ///
    /// All-or-nothing: on failure no directory for `key` is left behind.
    ///
    /// # Errors
    /// Returns [`StorageError::AlreadyExists`] if `key` was used before, or
    /// [`StorageError::Io`] if any directory or file operation fails.
    pub async fn write(&self, key: StorageKey, parts: &StoryParts) -> StorageResult<PathBuf> {
        let target = self.location(key);
        if tokio::fs::try_exists(&target)
            .await
            .map_err(io_err(&target))?
        {
            return Err(StorageError::AlreadyExists(target));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_err(&self.root))?;

        let staging = self.staging_location(key);
        tokio::fs::create_dir(&staging)
            .await
            .map_err(io_err(&staging))?;

        Self::stage_and_publish(&staging, &target, parts).await?;

        debug!("Stored story at {}", target.display());
        Ok(target)
    }

    /// Fill `staging` and rename it to `target`; the staging directory is
    /// removed if either step fails.
    async fn stage_and_publish(
        staging: &Path,
        target: &Path,
        parts: &StoryParts,
    ) -> StorageResult<()> {
        let result = Self::fill_and_publish(staging, target, parts).await;
        if result.is_err() {
            discard_staging(staging).await;
        }
        result
    }

    async fn fill_and_publish(
        staging: &Path,
        target: &Path,
        parts: &StoryParts,
    ) -> StorageResult<()> {
        for (i, part) in parts.as_array().iter().enumerate() {
            let path = staging.join(part_file_name(i + 1));
            tokio::fs::write(&path, part.as_bytes())
                .await
                .map_err(io_err(&path))?;
        }

        if tokio::fs::try_exists(target).await.map_err(io_err(target))? {
            return Err(StorageError::AlreadyExists(target.to_path_buf()));
        }
        tokio::fs::rename(staging, target)
            .await
            .map_err(io_err(target))
    }
}

async fn discard_staging(staging: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(staging).await {
        warn!("Failed to remove staging dir {}: {e}", staging.display());
    }
}
