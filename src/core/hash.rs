// src/core/hash.rs

//! The password hashing contract.

use sha2::{Digest, Sha256};

/// Contract for the password-hash algorithm, consumed as
/// `hash(plaintext) -> digest`.
///
/// Digests are compared for equality, so an implementation must be
/// deterministic for a given input.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> String;
}

/// Reference hasher producing a hex-encoded SHA-256 digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, plaintext: &str) -> String {
        sha256_hex(plaintext)
    }
}

/// Hex-encoded SHA-256 of a string value.
pub(crate) fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}
