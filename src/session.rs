//! Session context shared by every panel.
//!
//! A "remembered" login is written to `session.json` in the data directory
//! and restored on the next launch; otherwise the session lives in memory
//! only and ends with the process.

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::User;
use crate::quote::Actor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Persisted "Remember me" session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` in the per-user data directory.
    pub fn default_location() -> Self {
        Self::new(AppConfig::data_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the remembered user, if any.
    pub fn load(&self) -> Result<Option<User>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, user: &User) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(user)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Configuration, API client and the logged-in user.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub api: ApiClient,
    store: SessionStore,
    user: Option<User>,
}

impl AppContext {
    /// Build the context and restore a remembered session.
    ///
    /// An unreadable session file is discarded rather than failing startup.
    pub fn init(config: AppConfig, store: SessionStore) -> Result<Self> {
        let api = ApiClient::new(&config.api.base_url())?;
        let user = match store.load() {
            Ok(user) => user,
            Err(e) => {
                warn!("Discarding unreadable session file {:?}: {}", store.path(), e);
                if let Err(e) = store.clear() {
                    warn!("Failed to remove session file: {}", e);
                }
                None
            }
        };
        if let Some(user) = &user {
            info!("Restored session for {}", user.sales_p_code);
        }
        Ok(Self { config, api, store, user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Start a session. With `remember`, the user survives a restart.
    pub fn login(&mut self, user: User, remember: bool) -> Result<()> {
        if remember {
            self.store.save(&user)?;
        } else {
            self.store.clear()?;
        }
        info!("Session started for {} (remember: {remember})", user.sales_p_code);
        self.user = Some(user);
        Ok(())
    }

    /// End the session and forget any remembered login.
    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        self.store.clear()
    }

    /// Salesperson scope for list endpoints: members see only their own
    /// records, approvers see everything.
    pub fn scope_code(&self) -> Option<String> {
        self.user
            .as_ref()
            .filter(|u| !u.is_approver())
            .map(|u| u.sales_p_code.clone())
    }

    pub fn actor(&self) -> Option<Actor> {
        self.user.as_ref().map(Actor::from_user)
    }

    /// Salesperson code of the current user, empty when logged out.
    pub fn salesperson_code(&self) -> String {
        self.user.as_ref().map(|u| u.sales_p_code.clone()).unwrap_or_default()
    }

    pub fn is_approver(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_approver)
    }
}
