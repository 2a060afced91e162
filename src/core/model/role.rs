// src/core/model/role.rs

//! The role entity of the security model.

use crate::core::matcher::PathRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named bundle of granted permissions and allowed paths.
///
/// The `weight` orders roles for "highest privilege" comparisons. The path
/// rule list is ordered and order is significant: a later rule overrides an
/// earlier one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Role {
    /// Unique id of the role, assigned by the owning store.
    pub id: String,
    /// The role name.
    pub name: String,
    #[serde(default)]
    pub weight: i64,
    /// Permission codes granted to this role.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    /// Ordered list of allowed path rules.
    #[serde(default)]
    pub paths: Vec<PathRule>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Role {
            id: id.into(),
            name: name.into(),
            weight: 0,
            permissions: BTreeSet::new(),
            paths: Vec::new(),
        }
    }

    /// Checks whether this role grants the permission.
    pub fn is_permission_granted(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }
}
