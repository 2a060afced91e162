// src/core/auth/session.rs

//! Token-based proof of identity across requests.

use crate::core::auth::{
    Authenticator, SessionStore, PREFERENCE_TIMEOUT, PREFERENCE_TOKEN, SESSION_AUTHENTICATION,
    SESSION_SWITCHED_USERNAME, SESSION_USERNAME,
};
use crate::core::errors::SecurityError;
use crate::core::hash::{sha256_hex, PasswordHasher};
use crate::core::model::{BackingStore, User};
use crate::config::SecurityConfig;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;

/// Authenticator persisting identity in a caller-supplied session store.
///
/// In the default mode, identity is proven by a `(username, identifier)` pair
/// where the identifier is a salted digest of the username; the same
/// credential pair authenticates any number of concurrent clients. In unique
/// mode, a server-side rotating token with an expiry is kept in the user's
/// preferences, permitting only one live session per user: every `set_user`
/// issues a fresh token, invalidating earlier sessions.
pub struct SessionAuthenticator {
    store: Arc<dyn BackingStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    salt: String,
    timeout: Duration,
    unique: bool,
    switch_permission: String,
    /// Outer `None`: not resolved yet. Inner `None`: resolved to anonymous.
    user: Mutex<Option<Option<Arc<User>>>>,
}

impl SessionAuthenticator {
    /// Creates a new authenticator, rejecting an unusable configuration.
    pub fn new(
        store: Arc<dyn BackingStore>,
        sessions: Arc<dyn SessionStore>,
        config: &SecurityConfig,
    ) -> Result<Self, SecurityError> {
        config.validate()?;

        Ok(SessionAuthenticator {
            store,
            sessions,
            hasher: None,
            salt: config.salt.clone(),
            timeout: config.session_timeout,
            unique: config.unique_session,
            switch_permission: config.switch_permission.clone(),
            user: Mutex::new(None),
        })
    }

    /// Sets the password hasher. Without one, passwords are compared as
    /// plain text.
    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// True when only one live session per user is permitted.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    fn hash_password(&self, password: &str) -> String {
        match &self.hasher {
            Some(hasher) => hasher.hash(password),
            None => password.to_string(),
        }
    }

    /// The identifier proving knowledge of the salt for a given value.
    fn identifier(&self, value: &str) -> String {
        sha256_hex(&format!(
            "{}{}",
            self.salt,
            sha256_hex(&format!("{}{}", value, self.salt))
        ))
    }

    fn generate_token() -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Clears every session key and caches the anonymous resolution.
    async fn clear_session(&self) {
        self.sessions.set(SESSION_AUTHENTICATION, None).await;
        self.sessions.set(SESSION_SWITCHED_USERNAME, None).await;
        self.sessions.set(SESSION_USERNAME, None).await;

        *self.user.lock() = Some(None);
    }

    /// Checks the rotating-token proof of a unique-mode session.
    async fn is_unique_authentication(&self, user: &User) -> bool {
        let Some(string) = self.sessions.get(SESSION_AUTHENTICATION).await else {
            return false;
        };
        let Some((identifier, token)) = string.split_once(':') else {
            return false;
        };

        let alphanumeric = |value: &str| {
            !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
        };
        if !alphanumeric(identifier) || !alphanumeric(token) {
            return false;
        }

        let Some(user_token) = user.preference(PREFERENCE_TOKEN) else {
            return false;
        };
        let user_timeout = user
            .preference(PREFERENCE_TIMEOUT)
            .and_then(|timeout| timeout.parse::<i64>().ok())
            .unwrap_or(0);

        user_token == token
            && user_timeout > Utc::now().timestamp()
            && self.identifier(&user.username) == identifier
    }

    /// Resolves the current user from the session store.
    async fn resolve(&self) -> Result<Option<Arc<User>>, SecurityError> {
        let Some(username) = self.sessions.get(SESSION_USERNAME).await else {
            return Ok(None);
        };

        let Some(user) = self.store.user_by_username(&username).await? else {
            return Ok(None);
        };

        if self.unique {
            if !self.is_unique_authentication(&user).await {
                return Ok(None);
            }
        } else {
            let identifier = self.identifier(&user.username);
            let proof = self.sessions.get(SESSION_AUTHENTICATION).await;
            if proof.as_deref() != Some(identifier.as_str()) {
                return Ok(None);
            }
        }

        let user = Arc::new(user);

        let Some(switched_username) = self.sessions.get(SESSION_SWITCHED_USERNAME).await else {
            return Ok(Some(user));
        };

        let Some(switched) = self.store.user_by_username(&switched_username).await? else {
            return Ok(Some(user));
        };

        if !user.is_super_user && !user.is_permission_granted(&self.switch_permission) {
            self.sessions.set(SESSION_SWITCHED_USERNAME, None).await;

            return Err(SecurityError::Unauthorized(
                "could not switch user: not allowed".to_string(),
            ));
        }

        Ok(Some(Arc::new(switched)))
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<User>, SecurityError> {
        let user = self.store.user_by_username(username).await?;

        let Some(user) = user else {
            self.clear_session().await;

            return Err(SecurityError::UnknownUser(username.to_string()));
        };

        if !user.is_active {
            self.clear_session().await;

            return Err(SecurityError::InactiveUser(username.to_string()));
        }

        if self.hash_password(password) != user.password_hash {
            self.clear_session().await;

            return Err(SecurityError::BadCredentials);
        }

        self.set_user(user).await
    }

    async fn logout(&self) -> Result<(), SecurityError> {
        if self.sessions.get(SESSION_SWITCHED_USERNAME).await.is_some() {
            // Logout of an active switch restores the base identity without
            // re-authentication.
            self.sessions.set(SESSION_SWITCHED_USERNAME, None).await;
            *self.user.lock() = None;

            return Ok(());
        }

        self.clear_session().await;

        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Arc<User>>, SecurityError> {
        if let Some(resolved) = self.user.lock().clone() {
            return Ok(resolved);
        }

        let resolved = self.resolve().await?;
        *self.user.lock() = Some(resolved.clone());

        Ok(resolved)
    }

    async fn set_user(&self, mut user: User) -> Result<Arc<User>, SecurityError> {
        let identifier = self.identifier(&user.username);

        if !self.unique {
            self.sessions
                .set(SESSION_USERNAME, Some(user.username.clone()))
                .await;
            self.sessions
                .set(SESSION_AUTHENTICATION, Some(identifier))
                .await;

            let user = Arc::new(user);
            *self.user.lock() = Some(Some(user.clone()));

            return Ok(user);
        }

        // Unique mode: a fresh token invalidates any earlier session of this
        // user, and the expiry is refreshed only here, never on a read.
        let token = Self::generate_token();
        let timeout = Utc::now().timestamp() + self.timeout.as_secs() as i64;

        self.sessions
            .set(SESSION_USERNAME, Some(user.username.clone()))
            .await;
        self.sessions
            .set(SESSION_AUTHENTICATION, Some(format!("{identifier}:{token}")))
            .await;

        user.set_preference(PREFERENCE_TOKEN, Some(token));
        user.set_preference(PREFERENCE_TIMEOUT, Some(timeout.to_string()));

        self.store.save_user(&user).await?;

        let user = Arc::new(user);
        *self.user.lock() = Some(Some(user.clone()));

        Ok(user)
    }

    async fn switch_user(&self, username: &str) -> Result<(), SecurityError> {
        let Some(user) = self.current_user().await? else {
            return Err(SecurityError::Unauthorized(
                "could not switch user: not authenticated".to_string(),
            ));
        };

        if !user.is_super_user && !user.is_permission_granted(&self.switch_permission) {
            return Err(SecurityError::Unauthorized(
                "could not switch user: not allowed".to_string(),
            ));
        }

        let Some(switched) = self.store.user_by_username(username).await? else {
            return Err(SecurityError::UserNotFound(username.to_string()));
        };

        if switched.is_super_user && !user.is_super_user {
            return Err(SecurityError::PrivilegeEscalation(username.to_string()));
        }

        self.sessions
            .set(SESSION_SWITCHED_USERNAME, Some(username.to_string()))
            .await;
        *self.user.lock() = Some(Some(Arc::new(switched)));

        Ok(())
    }

    async fn is_switched(&self) -> bool {
        self.sessions.get(SESSION_SWITCHED_USERNAME).await.is_some()
    }
}
