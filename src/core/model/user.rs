// src/core/model/user.rs

//! The user entity of the security model.

use crate::core::matcher::PathMatcher;
use crate::core::model::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single user account.
///
/// A user is owned by exactly one backing store. The `username` is the
/// immutable identity key; the `preferences` map is an open string-keyed
/// store, also used by the session authenticator to persist its rotating
/// token and expiry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    /// Unique id of the user, assigned by the owning store.
    pub id: String,
    /// The username.
    pub username: String,
    /// The password digest, as produced by the configured hasher.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_super_user: bool,
    /// Roles of the user, in assignment order.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Open string-keyed preference map.
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Creates a new, active, non-privileged user.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        User {
            id: id.into(),
            username: username.into(),
            password_hash: String::new(),
            display_name: None,
            email: None,
            is_active: true,
            is_super_user: false,
            roles: Vec::new(),
            preferences: BTreeMap::new(),
        }
    }

    /// Checks whether any of the user's roles grants the permission.
    pub fn is_permission_granted(&self, code: &str) -> bool {
        self.roles.iter().any(|role| role.is_permission_granted(code))
    }

    /// Checks whether any of the user's roles allows the path.
    pub fn is_path_allowed(&self, path: &str, method: Option<&str>, matcher: &PathMatcher) -> bool {
        self.roles
            .iter()
            .any(|role| matcher.matches(path, method, &role.paths))
    }

    /// The highest weight among the user's roles, 0 when the user has none.
    pub fn role_weight(&self) -> i64 {
        self.roles.iter().map(|role| role.weight).max().unwrap_or(0)
    }

    /// Sets a preference, removing it when `value` is `None`.
    pub fn set_preference(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.preferences.insert(name, value);
            }
            None => {
                self.preferences.remove(&name);
            }
        }
    }

    /// Gets a preference.
    pub fn preference(&self, name: &str) -> Option<&str> {
        self.preferences.get(name).map(String::as_str)
    }
}
