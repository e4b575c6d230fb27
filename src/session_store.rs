use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error, warn};

const APP_DIR: &str = "feed-llm";
const SELECTIONS_DIR: &str = "selections";

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("no per-user state directory is available")]
    NoStateDir,

    #[error("I/O error for path {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed selection file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },
}

/// On-disk document: `{"selected_files": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedSelection {
    #[serde(default)]
    selected_files: Vec<String>,
}

/// Remembers which root-relative files were selected for a given root.
///
/// Neither operation fails loudly: problems are logged and `load` falls back
/// to an empty set.
pub trait SelectionStore {
    fn load(&self, root: &Path) -> Vec<String>;
    fn save(&self, root: &Path, selected: &[String]) -> bool;
}

/// One JSON file per root, named after the SHA-256 of the root's canonical
/// path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    state_dir: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(state_dir: Option<PathBuf>) -> Self {
        Self { state_dir }
    }

    /// `<state dir>/feed-llm/selections`, using the local data dir on
    /// platforms without a state dir.
    pub fn default_state_dir() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|dir| dir.join(APP_DIR).join(SELECTIONS_DIR))
    }

    pub fn file_for(&self, root: &Path) -> Result<PathBuf, SessionStoreError> {
        let dir = self
            .state_dir
            .as_ref()
            .ok_or(SessionStoreError::NoStateDir)?;
        Ok(dir.join(state_file_name(root)))
    }

    fn try_load(&self, root: &Path) -> Result<Vec<String>, SessionStoreError> {
        let path = self.file_for(root)?;
        let content = fs::read_to_string(&path).map_err(|source| SessionStoreError::Io {
            path: path.clone(),
            source,
        })?;
        let saved: SavedSelection = serde_json::from_str(&content)?;
        Ok(saved.selected_files)
    }

    fn try_save(&self, root: &Path, selected: &[String]) -> Result<PathBuf, SessionStoreError> {
        let path = self.file_for(root)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| SessionStoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let document = SavedSelection {
            selected_files: selected.to_vec(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        // Same directory as the target so the rename stays on one filesystem.
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|source| SessionStoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let temp_path = temp_file.path().to_path_buf();
        temp_file
            .write_all(content.as_bytes())
            .and_then(|_| temp_file.flush())
            .map_err(|source| SessionStoreError::Io {
                path: temp_path,
                source,
            })?;
        temp_file
            .persist(&path)
            .map_err(|source| SessionStoreError::Persist {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

impl SelectionStore for JsonFileStore {
    fn load(&self, root: &Path) -> Vec<String> {
        match self.try_load(root) {
            Ok(selected) => {
                debug!(
                    event = "store.load.completed",
                    root = %root.display(),
                    count = selected.len()
                );
                selected
            }
            Err(e) => {
                warn!(event = "store.load.failed", root = %root.display(), error = %e);
                Vec::new()
            }
        }
    }

    fn save(&self, root: &Path, selected: &[String]) -> bool {
        match self.try_save(root, selected) {
            Ok(path) => {
                debug!(
                    event = "store.save.completed",
                    path = %path.display(),
                    count = selected.len()
                );
                true
            }
            Err(e) => {
                error!(event = "store.save.failed", root = %root.display(), error = %e);
                false
            }
        }
    }
}

/// Lowercase hex SHA-256 of `root` plus `.json`.
pub fn state_file_name(root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(root.to_string_lossy().as_bytes());
    format!("{:x}.json", hasher.finalize())
}
