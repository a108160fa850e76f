use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ConsoleError, Result};
use crate::models::CurrentUser;

/// Role name that bypasses every permission check.
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated session: the API token plus the identity it resolves to.
///
/// Access-control queries are pure functions of the loaded permission set.
/// A session whose user has not been fetched yet grants nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: CurrentUser) -> Self {
        self.username = user.username.clone();
        self.user = Some(user);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_ref())
            .is_some_and(|role| role.name.trim().eq_ignore_ascii_case(ADMIN_ROLE))
    }

    pub fn has_permission(&self, code: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.user
            .as_ref()
            .is_some_and(|u| u.permissions.iter().any(|p| p.codename == code))
    }

    pub fn can_view(&self, module: &str) -> bool {
        self.has_permission(&format!("{module}.view"))
    }

    pub fn can_update(&self, module: &str) -> bool {
        self.has_permission(&format!("{module}.update"))
    }

    pub fn can_delete(&self, module: &str) -> bool {
        self.has_permission(&format!("{module}.delete"))
    }

    /// User edits are granted by either `users.update` or the older `users.edit`.
    pub fn can_update_users(&self) -> bool {
        self.has_permission("users.update") || self.has_permission("users.edit")
    }

    /// Fails with `Forbidden` naming the missing code, mirroring the backend.
    pub fn require(&self, code: &str) -> Result<()> {
        if self.has_permission(code) {
            Ok(())
        } else {
            Err(ConsoleError::Forbidden {
                message: format!("Forbidden - {code} required"),
            })
        }
    }

    pub fn permission_codes(&self) -> Vec<&str> {
        self.user
            .as_ref()
            .map(|u| u.permissions.iter().map(|p| p.codename.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Where the session survives between runs. Written at login/logout only.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    slot: Arc<RwLock<Option<Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.slot.write().await.take();
        Ok(())
    }
}

/// JSON file holding the session, by default under the user's home directory.
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

    fn io_error(&self, action: &str, err: std::io::Error) -> ConsoleError {
        ConsoleError::Session(format!(
            "failed to {action} session file {}: {err}",
            self.path.display()
        ))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", err)),
        };
        let session = serde_json::from_str(&text).map_err(|e| {
            ConsoleError::Session(format!(
                "session file {} is corrupt ({e}); run logout to reset it",
                self.path.display()
            ))
        })?;
        tracing::debug!(path = %self.path.display(), "Restored session");
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }
        let body = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| self.io_error("write", e))?;
        tracing::debug!(path = %self.path.display(), user = %session.username, "Saved session");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}
