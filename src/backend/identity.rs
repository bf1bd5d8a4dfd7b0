//! Identity collaborator and its local, file-backed implementation

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::subscription::{Listeners, Subscription};
use crate::config::AccountConfig;
use crate::error::{AppError, Result};
use crate::model::Identity;

const SESSION_FILE: &str = "session.json";

pub type IdentityListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity restored from the persisted session, if any
    fn current(&self) -> Option<Identity>;

    async fn sign_in_anonymously(&self) -> Result<Identity>;

    async fn sign_in_federated(&self) -> Result<Identity>;

    async fn sign_out(&self) -> Result<()>;

    /// Fires once immediately with the current identity, then on every change.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}

/// Keeps the session in `session.json` and signs in with the configured
/// account profile.
pub struct LocalIdentity {
    path: PathBuf,
    account: AccountConfig,
    current: Mutex<Option<Identity>>,
    listeners: Listeners<Option<Identity>>,
}

impl LocalIdentity {
    pub fn new(data_dir: &Path, account: AccountConfig) -> Self {
        let path = data_dir.join(SESSION_FILE);
        let current = load_session(&path);
        if let Some(identity) = &current {
            tracing::info!(uid = %identity.uid, anonymous = identity.is_anonymous, "Restored session");
        }
        Self {
            path,
            account,
            current: Mutex::new(current),
            listeners: Listeners::new(),
        }
    }

    fn set_current(&self, identity: Option<Identity>) -> Result<()> {
        self.persist(identity.as_ref())?;
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = identity.clone();
        self.listeners.notify(&identity);
        Ok(())
    }

    fn persist(&self, identity: Option<&Identity>) -> Result<()> {
        let result = match identity {
            Some(identity) => serde_json::to_string_pretty(identity)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    if let Some(dir) = self.path.parent() {
                        fs::create_dir_all(dir).map_err(|e| e.to_string())?;
                    }
                    fs::write(&self.path, content).map_err(|e| e.to_string())
                }),
            None if self.path.exists() => fs::remove_file(&self.path).map_err(|e| e.to_string()),
            None => Ok(()),
        };
        result.map_err(|e| AppError::AuthFailure(format!("could not save session: {}", e)))
    }

    fn federated_identity(&self) -> Result<Identity> {
        let Some(email) = self.account.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            return Err(AppError::AuthFailure(
                "no [account] email configured".to_string(),
            ));
        };

        let display_name = self
            .account
            .display_name
            .clone()
            .or_else(|| email.split('@').next().map(str::to_string));

        Ok(Identity {
            uid: account_uid(email),
            is_anonymous: false,
            display_name,
            email: Some(email.to_string()),
        })
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn current(&self) -> Option<Identity> {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn sign_in_anonymously(&self) -> Result<Identity> {
        let identity = Identity {
            uid: format!("anon-{:016x}", rand::random::<u64>()),
            is_anonymous: true,
            display_name: None,
            email: None,
        };
        tracing::info!(uid = %identity.uid, "Signed in anonymously");
        self.set_current(Some(identity.clone()))?;
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<Identity> {
        let identity = self.federated_identity()?;
        tracing::info!(uid = %identity.uid, "Signed in with account");
        self.set_current(Some(identity.clone()))?;
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        tracing::info!("Signing out");
        self.set_current(None)
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        listener(self.current());
        self.listeners.add(move |identity| listener(identity.clone()))
    }
}

/// Stable uid for an account email
fn account_uid(email: &str) -> String {
    let slug: String = email
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("user-{}", slug)
}

fn load_session(path: &Path) -> Option<Identity> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            None
        }
    }
}

/// Shared handle used by the controller
pub type SharedIdentity = Arc<dyn IdentityProvider>;
