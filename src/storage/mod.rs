//! Named-buffer persistence.
//!
//! Buffers are saved and loaded by bare name through the [`Store`] trait; the
//! default backing is a flat directory of files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid buffer name: {0}")]
    InvalidName(String),
    #[error("could not save: {0}")]
    Save(#[source] io::Error),
    #[error("could not load: {0}")]
    Load(#[source] io::Error),
}

/// Persistence backend for named buffers.
pub trait Store {
    /// Persist `content` under `name`, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for invalid names or write failures.
    fn save(&self, name: &str, content: &str) -> Result<(), StoreError>;

    /// Load the buffer saved under `name`; `Ok(None)` means no such buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for invalid names or read failures.
    fn load(&self, name: &str) -> Result<Option<String>, StoreError>;
}

/// A [`Store`] over a single flat directory, one file per buffer.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Buffer names are flat identifiers, never paths into the tree.
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty()
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains(char::is_control)
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Store for DirStore {
    fn save(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).map_err(StoreError::Save)?;
        fs::write(&path, content).map_err(StoreError::Save)?;
        debug!(path = %path.display(), bytes = content.len(), "buffer saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Load(e)),
        }
    }
}
