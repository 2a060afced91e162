// src/core/manager.rs

//! Facade to the security system.

use crate::core::auth::Authenticator;
use crate::core::errors::SecurityError;
use crate::core::events::{login_payload, EventSink, EVENT_LOGIN};
use crate::core::hash::PasswordHasher;
use crate::core::model::{BackingStore, User};
use crate::core::voter::{Vote, Voter, VoterChain};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Permission required to switch users.
pub const PERMISSION_SWITCH: &str = "security.switch";

/// Wires the authenticator, backing model, voters, hasher and event sink
/// together and exposes the decision operations.
///
/// The model, voters, hasher and event sink are all optional. Permission and
/// path checks fail open when the model or the voters are missing; the
/// decision and its reason are logged either way.
pub struct SecurityManager {
    authenticator: Arc<dyn Authenticator>,
    model: Option<Arc<dyn BackingStore>>,
    voters: Option<Arc<VoterChain>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    events: Option<Arc<dyn EventSink>>,
}

impl SecurityManager {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        SecurityManager {
            authenticator,
            model: None,
            voters: None,
            hasher: None,
            events: None,
        }
    }

    /// Sets the backing model, if it reports itself ready.
    pub async fn with_model(mut self, model: Arc<dyn BackingStore>) -> Self {
        if model.ping().await {
            self.model = Some(model);
        } else {
            debug!("Security model provided but not ready for work, running without one");
        }

        self
    }

    /// Sets the voter chain.
    pub fn with_voters(mut self, voters: Arc<VoterChain>) -> Self {
        self.voters = Some(voters);
        self
    }

    /// Sets the password hasher. Without one, `hash_password` is the identity
    /// function: an explicitly insecure default, not silently strengthened.
    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the event sink receiving login notifications.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn model(&self) -> Option<&Arc<dyn BackingStore>> {
        self.model.as_ref()
    }

    /// The backing model, failing when none is configured.
    pub fn require_model(&self) -> Result<&Arc<dyn BackingStore>, SecurityError> {
        self.model.as_ref().ok_or(SecurityError::ModelNotConfigured)
    }

    /// Hashes a password with the configured hasher, or returns it untouched
    /// when none is configured.
    pub fn hash_password(&self, password: &str) -> String {
        match &self.hasher {
            Some(hasher) => hasher.hash(password),
            None => password.to_string(),
        }
    }

    /// The voters participating in decisions, treating a configured-but-empty
    /// chain exactly like an absent one.
    fn participating_voters(&self) -> Option<&Arc<VoterChain>> {
        self.voters.as_ref().filter(|voters| !voters.is_empty())
    }

    /// Resolves the current user, downgrading any authentication-layer error
    /// to anonymous: a failed lookup must never abort a decision.
    async fn resolve_user(&self) -> Option<Arc<User>> {
        match self.authenticator.current_user().await {
            Ok(user) => user,
            Err(e) => {
                debug!("Treating current user as anonymous: {}", e);
                None
            }
        }
    }

    /// Checks whether the current user is granted the provided permission.
    ///
    /// Checking a permission the model does not know yet registers it.
    pub async fn is_permission_granted(&self, code: &str) -> bool {
        if self.model.is_none() {
            debug!("Permission '{}' granted: no security model set", code);
            return true;
        }

        let Some(voters) = self.participating_voters() else {
            debug!("Permission '{}' granted: no voters set", code);
            return true;
        };

        let user = self.resolve_user().await;
        let vote = voters.vote_on_permission(code, user.as_deref()).await;

        match vote {
            Vote::Allow => {
                debug!("Permission '{}' granted", code);
                true
            }
            _ => {
                debug!("Permission '{}' denied", code);
                false
            }
        }
    }

    /// Checks whether the current user is allowed to visit the provided path.
    ///
    /// The method defaults to `GET`.
    pub async fn is_path_allowed(&self, path: &str, method: Option<&str>) -> bool {
        if self.model.is_none() {
            debug!("Path '{}' allowed: no security model set", path);
            return true;
        }

        let Some(voters) = self.participating_voters() else {
            debug!("Path '{}' allowed: no voters set", path);
            return true;
        };

        let user = self.resolve_user().await;
        let vote = voters.vote_on_path(path, method, user.as_deref()).await;

        match vote {
            Vote::Allow => {
                debug!("Path '{}' allowed", path);
                true
            }
            _ => {
                debug!("Path '{}' denied", path);
                false
            }
        }
    }

    /// Checks whether the current user is allowed to visit the provided URL.
    pub async fn is_url_allowed(&self, url: &str) -> Result<bool, SecurityError> {
        let parsed =
            Url::parse(url).map_err(|_| SecurityError::MalformedUrl(url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(SecurityError::MalformedUrl(url.to_string()));
        }

        Ok(self.is_path_allowed(parsed.path(), None).await)
    }

    /// Logs a user in and publishes the login event, with a null user on a
    /// failed attempt. Authentication errors surface untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Arc<User>, SecurityError> {
        let result = self.authenticator.login(username, password).await;

        if let Some(events) = &self.events {
            let user = result.as_ref().ok().map(Arc::as_ref);
            events.publish(EVENT_LOGIN, login_payload(user)).await;
        }

        result
    }

    /// Logs the current user out. A logout during an active switch restores
    /// the base identity instead.
    pub async fn logout(&self) -> Result<(), SecurityError> {
        self.authenticator.logout().await
    }

    /// Switches the current user to another one.
    pub async fn switch_user(&self, username: &str) -> Result<(), SecurityError> {
        self.authenticator.switch_user(username).await
    }

    /// The current user, if authenticated.
    pub async fn current_user(&self) -> Result<Option<Arc<User>>, SecurityError> {
        self.authenticator.current_user().await
    }
}
