// src/core/auth/mod.rs

//! Current-user resolution and session persistence.

mod chain;
mod session;

pub use chain::ChainAuthenticator;
pub use session::SessionAuthenticator;

use crate::core::errors::SecurityError;
use crate::core::model::User;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Session key holding the username of the authenticated user.
pub const SESSION_USERNAME: &str = "security.username";

/// Session key holding the authentication proof string.
pub const SESSION_AUTHENTICATION: &str = "security.authentication";

/// Session key holding the username of an active user switch.
pub const SESSION_SWITCHED_USERNAME: &str = "security.username.switched";

/// User preference holding the last-issued session token (unique mode).
pub const PREFERENCE_TOKEN: &str = "security.token";

/// User preference holding the unix-seconds expiry of the session token
/// (unique mode).
pub const PREFERENCE_TIMEOUT: &str = "security.timeout";

/// Key/value session storage, keyed by session/cookie identity and supplied
/// by the caller.
///
/// Setting a key to `None` removes it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: Option<String>);
}

/// Owns current-user resolution and session persistence.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates the provided credentials and persists the identity.
    async fn login(&self, username: &str, password: &str) -> Result<Arc<User>, SecurityError>;

    /// Clears the persisted identity, or only the active user switch when one
    /// is in effect.
    async fn logout(&self) -> Result<(), SecurityError>;

    /// Resolves the current user. Resolved once, then cached for the request.
    async fn current_user(&self) -> Result<Option<Arc<User>>, SecurityError>;

    /// Persists the identity of an already-verified user.
    async fn set_user(&self, user: User) -> Result<Arc<User>, SecurityError>;

    /// Impersonates another user while keeping the base identity recoverable.
    async fn switch_user(&self, username: &str) -> Result<(), SecurityError>;

    /// True when a user switch is active.
    async fn is_switched(&self) -> bool;
}

/// An in-memory [`SessionStore`] for tests and single-process callers.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    async fn set(&self, key: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.values.write().insert(key.to_string(), value);
            }
            None => {
                self.values.write().remove(key);
            }
        }
    }
}
