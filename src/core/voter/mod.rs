// src/core/voter/mod.rs

//! Voters give tri-state opinions on permission and path checks.

mod chain;
mod model;

pub use chain::{GrantStrategy, VoterChain};
pub use model::ModelVoter;

use crate::core::model::User;
use async_trait::async_trait;

/// A single policy opinion.
///
/// "No opinion" is a first-class state: a voter that cannot judge a check
/// abstains instead of denying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Allow,
    Deny,
    Abstain,
}

/// A policy component giving an opinion on one permission or path check.
///
/// `user` is absent for an anonymous actor.
#[async_trait]
pub trait Voter: Send + Sync {
    /// Opinion on whether the user holds the permission.
    async fn vote_on_permission(&self, code: &str, user: Option<&User>) -> Vote;

    /// Opinion on whether the user may visit the path with the method.
    async fn vote_on_path(&self, path: &str, method: Option<&str>, user: Option<&User>) -> Vote;
}
