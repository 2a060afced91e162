// src/core/errors.rs

//! Defines the primary error type for the entire crate.

use thiserror::Error;

/// The main error enum, representing all possible failures within the engine.
/// Using `thiserror` allows for clean error definitions and automatic `Display`
/// implementations.
///
/// The error kind is the variant; [`SecurityError::field`] exposes which
/// credential field is implicated, for targeted form feedback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// No user exists for the supplied username.
    #[error("unknown user '{0}'")]
    UnknownUser(String),

    /// The user exists but has been deactivated.
    #[error("user '{0}' is inactive")]
    InactiveUser(String),

    /// The supplied password does not match the stored digest.
    #[error("invalid credentials")]
    BadCredentials,

    /// An operation requiring an authenticated or privileged actor was
    /// attempted without one.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The target of a user switch does not exist.
    #[error("could not switch user: user '{0}' not found")]
    UserNotFound(String),

    /// A non-super-user attempted to switch to a super-user.
    #[error("could not switch user: '{0}' is a super user")]
    PrivilegeEscalation(String),

    /// An operation requiring a backing model was invoked without one configured.
    #[error("no security model configured")]
    ModelNotConfigured,

    /// A URL could not be reduced to a path component.
    #[error("could not check permissions of URL '{0}': invalid URL")]
    MalformedUrl(String),

    /// Bad salt, timeout or strategy detected at setup time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A backing store or session store collaborator failed.
    #[error("store error: {0}")]
    Store(String),
}

/// The credential field implicated by an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    None,
    Username,
    Password,
}

impl SecurityError {
    /// Returns true for errors raised by the authentication layer.
    ///
    /// These are the errors a permission or path check downgrades to an
    /// anonymous verdict instead of propagating.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            SecurityError::UnknownUser(_)
                | SecurityError::InactiveUser(_)
                | SecurityError::BadCredentials
                | SecurityError::Unauthorized(_)
        )
    }

    /// The credential field implicated by this error.
    pub fn field(&self) -> CredentialField {
        match self {
            SecurityError::UnknownUser(_) | SecurityError::InactiveUser(_) => {
                CredentialField::Username
            }
            SecurityError::BadCredentials => CredentialField::Password,
            _ => CredentialField::None,
        }
    }
}
