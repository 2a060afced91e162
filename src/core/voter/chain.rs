// src/core/voter/chain.rs

//! Chains voters under a selectable aggregation strategy.

use crate::core::model::User;
use crate::core::voter::{Vote, Voter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Aggregation strategy of a [`VoterChain`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GrantStrategy {
    /// Grants as soon as one voter grants.
    #[default]
    Affirmative,
    /// Grants when more voters grant than deny; ties deny.
    Consensus,
    /// Grants only when every participating voter grants.
    Unanimous,
}

/// An ordered chain of voters aggregated under one [`GrantStrategy`].
///
/// An empty chain abstains before any strategy is applied. The chain itself
/// is a [`Voter`], so chains nest: a nested empty chain is simply an abstain
/// to its parent.
pub struct VoterChain {
    strategy: GrantStrategy,
    voters: Vec<Arc<dyn Voter>>,
}

impl VoterChain {
    pub fn new(strategy: GrantStrategy) -> Self {
        VoterChain {
            strategy,
            voters: Vec::new(),
        }
    }

    /// Adds a voter to the end of the chain.
    pub fn add_voter(&mut self, voter: Arc<dyn Voter>) {
        self.voters.push(voter);
    }

    pub fn strategy(&self) -> GrantStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Applies the strategy to the collected opinions.
    fn apply(&self, votes: &[Vote]) -> Vote {
        match self.strategy {
            GrantStrategy::Affirmative => {
                if votes.contains(&Vote::Allow) {
                    Vote::Allow
                } else if votes.contains(&Vote::Deny) {
                    Vote::Deny
                } else {
                    Vote::Abstain
                }
            }
            GrantStrategy::Consensus => {
                let allowed = votes.iter().filter(|vote| **vote == Vote::Allow).count();
                let denied = votes.iter().filter(|vote| **vote == Vote::Deny).count();
                if allowed > denied {
                    Vote::Allow
                } else {
                    Vote::Deny
                }
            }
            GrantStrategy::Unanimous => {
                if votes.iter().all(|vote| *vote == Vote::Allow) {
                    Vote::Allow
                } else {
                    Vote::Deny
                }
            }
        }
    }
}

#[async_trait]
impl Voter for VoterChain {
    async fn vote_on_permission(&self, code: &str, user: Option<&User>) -> Vote {
        if self.voters.is_empty() {
            return Vote::Abstain;
        }

        let mut votes = Vec::with_capacity(self.voters.len());
        for voter in &self.voters {
            let vote = voter.vote_on_permission(code, user).await;

            // Affirmative grants on the first allowing voter.
            if self.strategy == GrantStrategy::Affirmative && vote == Vote::Allow {
                return Vote::Allow;
            }

            votes.push(vote);
        }

        self.apply(&votes)
    }

    async fn vote_on_path(&self, path: &str, method: Option<&str>, user: Option<&User>) -> Vote {
        if self.voters.is_empty() {
            return Vote::Abstain;
        }

        let mut votes = Vec::with_capacity(self.voters.len());
        for voter in &self.voters {
            let vote = voter.vote_on_path(path, method, user).await;

            if self.strategy == GrantStrategy::Affirmative && vote == Vote::Allow {
                return Vote::Allow;
            }

            votes.push(vote);
        }

        self.apply(&votes)
    }
}
