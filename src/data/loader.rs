use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

use serde::Deserialize;

use super::cache::{read_cache, write_cache};
use super::model::CaseDataset;
use super::source::read_source;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be produced. Every variant ends the session.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset not found: neither {} nor {} exists", .cache.display(), .source_path.display())]
    NotFound { source_path: PathBuf, cache: PathBuf },
    #[error("cache {} is unreadable and source {} does not exist: {error:#}", .path.display(), .source_path.display())]
    Cache {
        path: PathBuf,
        source_path: PathBuf,
        error: anyhow::Error,
    },
    #[error("failed to read source {}: {error:#}", .path.display())]
    Source { path: PathBuf, error: anyhow::Error },
}

// ---------------------------------------------------------------------------
// Cache policy
// ---------------------------------------------------------------------------

/// When an existing cache file may be used instead of the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Existence alone makes the cache valid.
    Exists,
    /// The cache must be at least as new as the source, when the source exists.
    #[default]
    SourceModified,
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl CachePolicy {
    fn cache_is_valid(self, source: &Path, cache: &Path) -> bool {
        if !cache.is_file() {
            return false;
        }
        match self {
            CachePolicy::Exists => true,
            CachePolicy::SourceModified => match (modified(source), modified(cache)) {
                (Some(src), Some(cached)) => cached >= src,
                // Source gone or unreadable mtime: nothing to compare against.
                _ => true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetLoader
// ---------------------------------------------------------------------------

/// Loads the case dataset once and hands out the shared result afterwards.
#[derive(Debug)]
pub struct DatasetLoader {
    source: PathBuf,
    cache: PathBuf,
    policy: CachePolicy,
    loaded: OnceLock<Arc<CaseDataset>>,
}

impl DatasetLoader {
    pub fn new(source: impl Into<PathBuf>, cache: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            source: source.into(),
            cache: cache.into(),
            policy,
            loaded: OnceLock::new(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache
    }

    /// Return the dataset, reading or converting it on the first call only.
    pub fn load(&self) -> Result<Arc<CaseDataset>, LoadError> {
        if let Some(ds) = self.loaded.get() {
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(self.load_uncached()?);
        Ok(Arc::clone(self.loaded.get_or_init(|| ds)))
    }

    fn load_uncached(&self) -> Result<CaseDataset, LoadError> {
        let mut cache_error = None;
        if self.policy.cache_is_valid(&self.source, &self.cache) {
            match read_cache(&self.cache) {
                Ok(ds) => {
                    log::info!(
                        "Loaded {} cases from cache {}",
                        ds.len(),
                        self.cache.display()
                    );
                    return Ok(ds);
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable cache {}: {e:#}", self.cache.display());
                    cache_error = Some(e);
                }
            }
        } else if self.cache.is_file() {
            log::warn!(
                "Cache {} is older than {}, rebuilding",
                self.cache.display(),
                self.source.display()
            );
        }

        if !self.source.is_file() {
            return Err(match cache_error {
                Some(error) => LoadError::Cache {
                    path: self.cache.clone(),
                    source_path: self.source.clone(),
                    error,
                },
                None => LoadError::NotFound {
                    source_path: self.source.clone(),
                    cache: self.cache.clone(),
                },
            });
        }

        log::info!("Converting source {}", self.source.display());
        let ds = read_source(&self.source)
            .map(|table| table.into_dataset())
            .map_err(|error| LoadError::Source {
                path: self.source.clone(),
                error,
            })?;
        log::info!(
            "Normalized {} cases ({} known columns)",
            ds.len(),
            ds.columns.len()
        );

        match write_cache(&ds, &self.cache) {
            Ok(()) => log::info!("Wrote cache {}", self.cache.display()),
            Err(e) => log::warn!("Could not write cache {}: {e:#}", self.cache.display()),
        }
        Ok(ds)
    }
}
