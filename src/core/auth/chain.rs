// src/core/auth/chain.rs

//! Chains multiple authenticators together.

use crate::core::auth::Authenticator;
use crate::core::errors::SecurityError;
use crate::core::model::User;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// An ordered chain of authenticators.
///
/// `login` tries members in order: the first success wins, a not-found
/// failure falls through to the next member, and any other failure surfaces
/// immediately. `logout` and `switch_user` are attempted against every
/// member, so one failing backend does not block the others.
#[derive(Default)]
pub struct ChainAuthenticator {
    authenticators: Vec<Arc<dyn Authenticator>>,
    /// Outer `None`: not resolved yet. Inner `None`: resolved to anonymous.
    user: Mutex<Option<Option<Arc<User>>>>,
}

impl ChainAuthenticator {
    pub fn new() -> Self {
        ChainAuthenticator {
            authenticators: Vec::new(),
            user: Mutex::new(None),
        }
    }

    /// Adds an authenticator to the end of the chain.
    pub fn add_authenticator(&mut self, authenticator: Arc<dyn Authenticator>) {
        self.authenticators.push(authenticator);
    }

    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }
}

#[async_trait]
impl Authenticator for ChainAuthenticator {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<User>, SecurityError> {
        for authenticator in &self.authenticators {
            match authenticator.login(username, password).await {
                Ok(user) => {
                    *self.user.lock() = Some(Some(user.clone()));

                    return Ok(user);
                }
                // An unknown username falls through to the next member.
                Err(SecurityError::UnknownUser(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(SecurityError::UnknownUser(username.to_string()))
    }

    async fn logout(&self) -> Result<(), SecurityError> {
        for authenticator in &self.authenticators {
            if let Err(e) = authenticator.logout().await {
                debug!("Ignoring logout failure of a chained authenticator: {}", e);
            }
        }

        *self.user.lock() = None;

        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Arc<User>>, SecurityError> {
        if let Some(resolved) = self.user.lock().clone() {
            return Ok(resolved);
        }

        let mut resolved = None;
        for authenticator in &self.authenticators {
            if let Some(user) = authenticator.current_user().await? {
                resolved = Some(user);

                break;
            }
        }

        *self.user.lock() = Some(resolved.clone());

        Ok(resolved)
    }

    async fn set_user(&self, user: User) -> Result<Arc<User>, SecurityError> {
        let Some(authenticator) = self.authenticators.first() else {
            let user = Arc::new(user);
            *self.user.lock() = Some(Some(user.clone()));

            return Ok(user);
        };

        let user = authenticator.set_user(user).await?;
        *self.user.lock() = Some(Some(user.clone()));

        Ok(user)
    }

    async fn switch_user(&self, username: &str) -> Result<(), SecurityError> {
        let mut switched = false;
        let mut last_error = None;

        for authenticator in &self.authenticators {
            match authenticator.switch_user(username).await {
                Ok(()) => switched = true,
                Err(e) => {
                    debug!("Ignoring switch failure of a chained authenticator: {}", e);
                    last_error = Some(e);
                }
            }
        }

        if switched {
            // Let the next resolution pick up the switched identity.
            *self.user.lock() = None;

            return Ok(());
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn is_switched(&self) -> bool {
        for authenticator in &self.authenticators {
            if authenticator.is_switched().await {
                return true;
            }
        }

        false
    }
}
