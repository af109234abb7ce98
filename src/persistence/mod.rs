//! JSON save/load helpers
//!
//! Features:
//! - Pretty-printed JSON documents
//! - Atomic writes (tmp file → rename over target)
//! - Typed errors so callers can decide how to degrade

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised while reading or writing a persisted document
#[derive(Debug)]
pub enum PersistError {
    /// Filesystem access failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document was not valid JSON for the expected type
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PersistError::Json { path, source } => {
                write!(f, "invalid JSON in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Json { source, .. } => Some(source),
        }
    }
}

/// Load a JSON document. `Ok(None)` when the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| PersistError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Save a JSON document, creating parent directories as needed
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("space-dodger-persist-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = scratch_path("does-not-exist.json");
        let loaded: Option<BTreeMap<String, u32>> = load_json(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("save-then-load.json");
        let mut doc = BTreeMap::new();
        doc.insert("Easy".to_string(), 42u32);
        save_json(&path, &doc).unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded.get("Easy"), Some(&42));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_garbage_is_json_error() {
        let path = scratch_path("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<BTreeMap<String, u32>>(&path).unwrap_err();
        assert!(matches!(err, PersistError::Json { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }
}
