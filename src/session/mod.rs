//! Session directory handling.
//!
//! The protocol library persists its credentials under `<root>/<session id>`;
//! the file layout inside is its business. We only create the directory before
//! connecting and wipe it when the account is logged out.

use crate::error::SessionError;
use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Clone, Debug)]
pub struct SessionDir {
    root: PathBuf,
    id: String,
}

impl SessionDir {
    pub fn new(root: impl Into<PathBuf>, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(SessionError::InvalidId(id).into());
        }
        Ok(Self {
            root: root.into(),
            id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.id)
    }

    /// Create the root and session directory if missing.
    pub async fn ensure(&self) -> Result<PathBuf> {
        let path = self.path();
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| SessionError::Create {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Delete stored credentials. Missing directory is not an error.
    pub async fn remove(&self) -> Result<()> {
        let path = self.path();
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "removed session credentials");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove { path, source }.into()),
        }
    }
}
