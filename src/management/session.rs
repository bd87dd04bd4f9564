use std::{fmt, path::PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;

/// The backend session cookie as kept on disk between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub cookie: String,
    /// Unix timestamp of when the cookie was obtained.
    pub stored_at: i64,
}

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session cache unavailable: {}", e),
            SessionError::Format(e) => write!(f, "session cache is corrupt: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Format(e)
    }
}

/// Reads and writes the stored session cookie.
///
/// The browser login hands the session to the local callback server only
/// once, so it has to be kept for later invocations of the CLI.
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// The store in the local data directory (`<data>/freesound/cache/session.json`).
    pub fn new() -> Self {
        Self::at(config::data_dir().join("cache").join("session.json"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stored cookie, or `None` when nobody has logged in yet.
    pub async fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// The cookie alone, ignoring a missing or unreadable cache.
    pub async fn cookie(&self) -> Option<String> {
        self.load().await.ok().flatten().map(|s| s.cookie)
    }

    pub async fn persist(&self, cookie: &str) -> Result<StoredSession, SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let session = StoredSession {
            cookie: cookie.to_string(),
            stored_at: Utc::now().timestamp(),
        };
        let json = serde_json::to_string_pretty(&session)?;
        async_fs::write(&self.path, json).await?;
        Ok(session)
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        if self.path.is_file() {
            async_fs::remove_file(&self.path).await?;
        }
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
