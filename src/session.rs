//! On-disk session persistence.
//!
//! One JSON file holds the `{token, refresh, username}` record written at
//! login and deleted at logout. The store is an explicit value handed to
//! whoever needs it; there is no process-global session.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::api::models::Session;
use crate::error::{Error, Result};

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform data directory (the usual choice for the
    /// real app).
    pub fn open_default() -> Result<Self> {
        let proj = ProjectDirs::from("com", "anymty", "Anymty")
            .ok_or_else(|| Error::Storage("no data directory".to_string()))?;
        Ok(Self {
            path: proj.data_dir().join("session.json"),
        })
    }

    /// Store at an explicit path. Tests point this at a temp dir.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `None` when no session has been saved (or it was cleared).
    pub fn load(&self) -> Result<Option<Session>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::storage(e)),
        };
        let session = serde_json::from_slice(&bytes).map_err(Error::storage)?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(Error::storage)?;
        }
        let json = serde_json::to_vec(session).map_err(Error::storage)?;
        fs::write(&self.path, json).map_err(Error::storage)
    }

    /// Removes the stored session. Clearing a store that holds nothing is
    /// fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(e)),
        }
    }
}
