//! Session store
//!
//! Holds the credential of the signed-in user and derives their role.
//! The credential is the only piece of client state that outlives a run:
//! it is written through a [`SessionStore`] so the next start can restore it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use directories::ProjectDirs;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Reserved credential value that marks the administrator
pub const ADMIN_CREDENTIAL: &str = "admin";

/// Basic pair transmitted for the administrator credential
const ADMIN_BASIC_PAIR: &str = "admin:admin";

const SESSION_FILE: &str = "session";

/// Role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Map a raw credential to a role
pub fn derive_role(credential: &str) -> Role {
    if credential == ADMIN_CREDENTIAL {
        Role::Admin
    } else {
        Role::User
    }
}

/// An authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    credential: String,
    role: Role,
}

impl Session {
    pub fn new(credential: impl Into<String>) -> Self {
        let credential = credential.into();
        let role = derive_role(&credential);
        Self { credential, role }
    }

    /// Credential produced by a successful login
    pub fn from_login(email: &str, password: &str) -> Self {
        Self::new(STANDARD.encode(format!("{}:{}", email, password)))
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Value of the `Authorization` header
    pub fn authorization_header(&self) -> String {
        match self.role {
            Role::Admin => format!("Basic {}", STANDARD.encode(ADMIN_BASIC_PAIR)),
            Role::User => format!("Basic {}", self.credential),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credential", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Scoped storage for the credential
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, credential: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, credential: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Store backed by a single file in the data directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    /// Store in the platform data directory
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "onyx", "skillzone").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(Self::new(dirs.data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let credential = contents.trim();
                Ok((!credential.is_empty()).then(|| credential.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The live session plus its backing store.
///
/// Storage faults are logged and never fail these operations; the
/// in-memory session stays authoritative for the running process.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Create a manager, restoring any credential the store already holds
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        let restored = match store.load() {
            Ok(Some(credential)) => {
                debug!("Restored session from store");
                Some(Session::new(credential))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                None
            }
        };

        Self {
            store,
            current: RwLock::new(restored),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::default()))
    }

    pub fn set_session(&self, credential: &str) {
        let session = Session::new(credential);
        info!(role = session.role().label(), "Session started");

        if let Err(e) = self.store.save(credential) {
            warn!(error = %e, "Failed to persist session");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn get_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_session(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Session cleared");
        }

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.get_session().map(|s| s.role())
    }
}
