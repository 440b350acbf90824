//! Artifact cache gate.
//!
//! Whether a filesystem-backed artifact cache is active is decided by one
//! environment-level setting. Absence of the setting means the feature is
//! disabled — a first-class state, not an error. The cache's eviction and
//! storage policy is out of scope here; only the directory contract
//! matters.

use std::path::{Path, PathBuf};
use tracing::debug;

/// A filesystem-backed artifact cache rooted at one directory.
///
/// The directory is guaranteed to exist for as long as nothing external
/// removes it — [`resolve_cache`] creates it (and any missing parents)
/// before handing out the value.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    fn new(root: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a cache key to a stable path under the cache root.
    ///
    /// Keys are sanitized so they cannot escape the root: anything that is
    /// not alphanumeric, `-`, `_`, or `.` becomes `_`, and a key that is
    /// only dots is replaced entirely.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

/// Resolves the cache gate from the cache directory setting.
///
/// `None` (setting unset) disables caching and performs no filesystem
/// mutation. `Some(dir)` ensures the directory exists and returns a cache
/// bound to it.
///
/// # Errors
///
/// Returns the underlying [`std::io::Error`] if the directory cannot be
/// created — a fatal bootstrap error for the caller.
pub fn resolve_cache(setting: Option<&Path>) -> std::io::Result<Option<FileCache>> {
    match setting {
        None => {
            debug!("artifact cache disabled");
            Ok(None)
        }
        Some(dir) => {
            let cache = FileCache::new(dir.to_path_buf())?;
            debug!(root = %cache.root().display(), "artifact cache enabled");
            Ok(Some(cache))
        }
    }
}

fn sanitize_key(key: &str) -> String {
    let mut cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // No parent-directory components, even after separator mangling.
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "_");
    }

    if cleaned.is_empty() || cleaned == "." {
        "_".into()
    } else {
        cleaned
    }
}
