// src/core/model/permission.rs

//! The permission entity of the security model.

use serde::{Deserialize, Serialize};

/// A named permission.
///
/// Codes are globally unique strings. The set of known codes grows lazily: a
/// permission is registered the first time it is checked and not yet known.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Permission {
    /// The unique code of the permission.
    pub code: String,
    /// A human description.
    #[serde(default)]
    pub description: String,
}

impl Permission {
    pub fn new(code: impl Into<String>) -> Self {
        Permission {
            code: code.into(),
            description: String::new(),
        }
    }
}
