//! Session object and its persisted cache.
//!
//! The session is an explicit value created at sign-in and destroyed at
//! sign-out, passed down to whichever flow needs it - never ambient global
//! state. The remote service is the source of truth for whether a token is
//! still valid; the local store is only a cache so a restart does not force
//! a fresh sign-in.

use std::fs;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use eshop_core::Role;

/// Fixed keys of the persisted session cache.
pub mod keys {
    /// Key for the auth token.
    pub const TOKEN: &str = "token";

    /// Key for the session role.
    pub const ROLE: &str = "role";
}

/// Errors that can occur reading or writing the session cache.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted cache is not valid JSON or misses a key.
    #[error("corrupt session cache: {0}")]
    Corrupt(String),
}

/// The authenticated user's token and role.
#[derive(Clone)]
pub struct Session {
    /// Opaque auth token sent as `x-auth-token`.
    pub token: SecretString,
    /// Role derived from the signin response.
    pub role: Role,
}

impl Session {
    /// Create a session from a signin outcome.
    #[must_use]
    pub const fn new(token: SecretString, role: Role) -> Self {
        Self { token, role }
    }

    /// Whether this session may use the admin product editor.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Persistence seam for the session cache.
pub trait SessionStore {
    /// Read the cached session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Persist the session under the fixed keys.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove the cached session entirely.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// On-disk representation, a flat JSON object with the fixed keys.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    role: Role,
}

/// JSON-file-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting at the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path this store persists at.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let persisted: PersistedSession =
            serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;

        debug!(role = %persisted.role, "restored session from cache");
        Ok(Some(Session::new(
            SecretString::from(persisted.token),
            persisted.role,
        )))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let persisted = PersistedSession {
            token: session.token.expose_secret().to_owned(),
            role: session.role,
        };
        let raw = serde_json::to_string(&persisted)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        fs::write(&self.path, raw)?;

        debug!(path = %self.path.display(), "session cached");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: std::sync::Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("poisoned lock".to_string()))?
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("poisoned lock".to_string()))? =
            Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self
            .session
            .lock()
            .map_err(|_| SessionError::Corrupt("poisoned lock".to_string()))? = None;
        Ok(())
    }
}
