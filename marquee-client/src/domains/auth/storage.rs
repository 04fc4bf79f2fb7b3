//! Persistent storage for the session token
//!
//! The token lives in one named slot that survives restarts. It is written
//! on login, removed on logout, and removed by the gateway whenever the
//! service answers with the unauthorized status.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::errors::SessionError;

#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Current token, if one is stored.
    async fn token(&self) -> Result<Option<String>, SessionError>;

    async fn store_token(&self, token: &str) -> Result<(), SessionError>;

    /// Removes the token. Clearing an empty slot succeeds.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// On-disk slot contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    /// When the token was written
    stored_at: DateTime<Utc>,
}

/// File-backed slot, readable by the owner only on unix.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, source: serde_json::Error) -> SessionError {
        SessionError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let stored: StoredSession =
            serde_json::from_slice(&data).map_err(|err| self.corrupt(err))?;
        Ok(Some(stored.token).filter(|token| !token.is_empty()))
    }

    async fn store_token(&self, token: &str) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let stored = StoredSession {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|err| self.corrupt(err))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        // Write then rename so readers never see a half-written slot.
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, json)
            .await
            .map_err(|err| self.io_error(err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&staging, perms)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| self.io_error(err))?;

        log::debug!(
            "[SessionStore] Stored session token at {}",
            self.path.display()
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                log::debug!(
                    "[SessionStore] Removed session token at {}",
                    self.path.display()
                );
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Process-local slot.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().clone())
    }

    async fn store_token(&self, token: &str) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.token.lock().take();
        Ok(())
    }
}
