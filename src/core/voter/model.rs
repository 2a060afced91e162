// src/core/voter/model.rs

//! A voter answering from the backing store.

use crate::core::errors::SecurityError;
use crate::core::matcher::{PathMatcher, PathRule};
use crate::core::model::{BackingStore, Role, User};
use crate::core::voter::{Vote, Voter};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::warn;

/// Votes from the roles and secured paths of the backing store.
///
/// Checking a permission code the store does not know yet registers it; this
/// side effect is part of the check operation, not hidden state.
///
/// A store failure while voting is logged and turns into an abstention: a
/// failed lookup must never abort an authorization decision.
pub struct ModelVoter {
    store: Arc<dyn BackingStore>,
    matcher: PathMatcher,
}

impl ModelVoter {
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        ModelVoter {
            store,
            matcher: PathMatcher::new(),
        }
    }

    /// Ensures the permission code exists, registering it when unknown.
    async fn register_permission(&self, code: &str) -> Result<(), SecurityError> {
        if !self.store.has_permission(code).await? {
            self.store.add_permission(code).await?;
        }
        Ok(())
    }

    /// The user's roles ordered by descending weight.
    ///
    /// The sort is stable, so roles of equal weight keep their assignment
    /// order and the first match wins a tie.
    fn roles_by_weight(user: &User) -> Vec<&Role> {
        let mut roles: Vec<&Role> = user.roles.iter().collect();
        roles.sort_by_key(|role| Reverse(role.weight));
        roles
    }
}

#[async_trait]
impl Voter for ModelVoter {
    async fn vote_on_permission(&self, code: &str, user: Option<&User>) -> Vote {
        if let Err(e) = self.register_permission(code).await {
            warn!("Could not register permission '{}': {}", code, e);
            return Vote::Abstain;
        }

        let Some(user) = user else {
            return Vote::Deny;
        };

        if user.is_super_user {
            return Vote::Allow;
        }

        // Grant sets carry no negation, so precedence degenerates to "any
        // role grants".
        for role in Self::roles_by_weight(user) {
            if role.is_permission_granted(code) {
                return Vote::Allow;
            }
        }

        Vote::Deny
    }

    async fn vote_on_path(&self, path: &str, method: Option<&str>, user: Option<&User>) -> Vote {
        let secured = match self.store.secured_paths().await {
            Ok(paths) => {
                let rules: Vec<PathRule> =
                    paths.iter().map(|path| PathRule::parse(path)).collect();
                self.matcher.matches(path, method, &rules)
            }
            Err(e) => {
                warn!("Could not read secured paths: {}", e);
                return Vote::Abstain;
            }
        };

        if !secured {
            // The path is not secured at all.
            return Vote::Allow;
        }

        let Some(user) = user else {
            return Vote::Deny;
        };

        if user.is_super_user {
            return Vote::Allow;
        }

        // The highest-weight role that expresses an opinion wins; ties are
        // broken by the first match in role order.
        for role in Self::roles_by_weight(user) {
            if !self.matcher.has_opinion(path, &role.paths) {
                continue;
            }

            return if self.matcher.matches(path, method, &role.paths) {
                Vote::Allow
            } else {
                Vote::Deny
            };
        }

        Vote::Deny
    }
}
