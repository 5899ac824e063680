//! Session persistence
//!
//! A session outlives a single CLI invocation, so it is kept in a small
//! JSON file between runs. Writes go to a temp file first and are renamed
//! into place, so a crash mid-write never leaves a torn session behind.

use super::types::Session;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where the current session lives between operations
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, if one exists
    async fn load(&self) -> Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    async fn save(&self, session: &Session) -> Result<()>;

    /// Drop the stored session; a no-op when none exists
    async fn clear(&self) -> Result<()>;
}

/// In-process store, used by tests and one-shot API use
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<RwLock<Option<Session>>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// JSON file store with atomic writes
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::session(format!("failed to read session file: {e}")))?;

        let session = serde_json::from_str(&contents)
            .map_err(|e| Error::session(format!("failed to parse session file: {e}")))?;

        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| Error::session(format!("failed to serialize session: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::session(format!("failed to create session dir: {e}")))?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::session(format!("failed to write session file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::session(format!("failed to rename session file: {e}")))?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::session(format!(
                "failed to remove session file: {e}"
            ))),
        }
    }
}
