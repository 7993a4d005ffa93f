//! On-disk cache maintenance.
//!
//! All filesystem work runs on the blocking pool so callers on the UI thread
//! or the bridge never wait on disk.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio::task;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{Error, Result};

// ============================================================================
// ClearReport
// ============================================================================

/// What a cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Directories deleted outright.
    pub removed_dirs: usize,
    /// Expired files deleted from the HTTP cache directory.
    pub purged_files: usize,
    /// Bytes left in the HTTP cache directory afterwards.
    pub remaining_bytes: u64,
}

// ============================================================================
// CacheStore
// ============================================================================

/// Maintains the cache directories described by a [`CacheConfig`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    config: CacheConfig,
}

impl CacheStore {
    /// Creates a store for `config`.
    #[inline]
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Creates the cache directories if missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a directory cannot be created.
    pub async fn ensure_dirs(&self) -> Result<()> {
        let config = self.config.clone();
        run_blocking(move || {
            fs::create_dir_all(config.cache_path())?;
            fs::create_dir_all(config.cookie_path())?;
            fs::create_dir_all(config.app_cache_path())?;
            Ok(())
        })
        .await
    }

    /// Deletes the app-cache and cookie directories and purges expired files
    /// from the HTTP cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on filesystem failure other than a missing path.
    pub async fn clear_all(&self) -> Result<ClearReport> {
        let config = self.config.clone();
        let report = run_blocking(move || {
            let mut report = ClearReport::default();
            for dir in [config.app_cache_path(), config.cookie_path()] {
                if remove_dir(&dir)? {
                    report.removed_dirs += 1;
                }
            }
            let cache_dir = config.cache_path();
            report.purged_files = purge_dir(&cache_dir, config.expiry(), SystemTime::now())?;
            report.remaining_bytes = dir_size(&cache_dir)?;
            Ok(report)
        })
        .await?;

        info!(
            removed_dirs = report.removed_dirs,
            purged_files = report.purged_files,
            remaining_bytes = report.remaining_bytes,
            "Cache cleared"
        );
        Ok(report)
    }

    /// Deletes files in the HTTP cache directory older than the expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on filesystem failure other than a missing path.
    pub async fn purge_expired(&self) -> Result<usize> {
        let dir = self.config.cache_path();
        let expiry = self.config.expiry();
        let purged = run_blocking(move || purge_dir(&dir, expiry, SystemTime::now())).await?;
        debug!(purged, "Expired cache files purged");
        Ok(purged)
    }

    /// Total size of the HTTP cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on filesystem failure other than a missing path.
    pub async fn size_bytes(&self) -> Result<u64> {
        let dir = self.config.cache_path();
        run_blocking(move || dir_size(&dir)).await
    }

    /// Clears the cache if it has grown past the size ceiling.
    ///
    /// Returns the cleanup report when a cleanup ran.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on filesystem failure.
    pub async fn enforce_size_limit(&self) -> Result<Option<ClearReport>> {
        let size = self.size_bytes().await?;
        if size <= self.config.max_size_bytes {
            return Ok(None);
        }
        warn!(
            size,
            limit = self.config.max_size_bytes,
            "Cache over size limit"
        );
        self.clear_all().await.map(Some)
    }
}

// ============================================================================
// Blocking Helpers
// ============================================================================

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(io::Error::other(e)))?
        .map_err(Error::from)
}

/// Removes `dir` recursively. Returns `false` if it did not exist.
fn remove_dir(dir: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Recursively deletes files last modified more than `expiry` before `now`.
fn purge_dir(dir: &Path, expiry: Duration, now: SystemTime) -> io::Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut purged = 0;
    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            purged += purge_dir(&entry.path(), expiry, now)?;
            continue;
        }
        let age = now
            .duration_since(metadata.modified()?)
            .unwrap_or(Duration::ZERO);
        if age > expiry {
            fs::remove_file(entry.path())?;
            purged += 1;
        }
    }
    Ok(purged)
}

/// Recursive size of the files under `dir`.
fn dir_size(dir: &Path) -> io::Result<u64> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut size = 0;
    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        size += if metadata.is_dir() {
            dir_size(&entry.path())?
        } else {
            metadata.len()
        };
    }
    Ok(size)
}

// ============================================================================
// Tests
// ============================================================================
