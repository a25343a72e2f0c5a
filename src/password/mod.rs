// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! bcrypt hashing of account passwords and the encoding Argo CD stores them in.

pub mod builtin;
pub mod htpasswd;

pub use builtin::BcryptHasher;
pub use htpasswd::HtpasswdHasher;

use crate::config::HasherKind;
use crate::constants::hashing::{COMPAT_PREFIX, NATIVE_PREFIX};
use crate::error::{Result, RotateError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Produces `$2y$` or `$2a$` bcrypt hashes
pub trait PasswordHasher: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Make sure the hasher can run, installing it when possible
    fn ensure_available(&self) -> Result<()>;

    /// Hash a plaintext password, returning the bcrypt string without a newline
    fn hash(&self, password: &str) -> Result<String>;
}

/// Construct the hasher selected in the configuration
pub fn hasher_for(kind: HasherKind) -> Box<dyn PasswordHasher> {
    match kind {
        HasherKind::Builtin => Box::new(BcryptHasher::new()),
        HasherKind::Htpasswd => Box::new(HtpasswdHasher::new()),
    }
}

/// A `$2a$` bcrypt hash together with the base64 form stored in the secret
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    hash: String,
    encoded: String,
}

impl EncodedHash {
    /// Validate a hasher's output, normalise the identifier to `$2a$` and encode it
    pub fn from_hash(raw: &str) -> Result<Self> {
        let hash = raw.trim();
        if hash.is_empty() {
            return Err(RotateError::HashFailed("hasher returned an empty result".to_string()));
        }

        let hash = if let Some(rest) = hash.strip_prefix(NATIVE_PREFIX) {
            format!("{}{}", COMPAT_PREFIX, rest)
        } else if hash.starts_with(COMPAT_PREFIX) {
            hash.to_string()
        } else {
            return Err(RotateError::HashFailed(
                "hasher output is not a bcrypt hash".to_string(),
            ));
        };

        let encoded = STANDARD.encode(hash.as_bytes());
        Ok(EncodedHash { hash, encoded })
    }

    /// The `$2a$` hash
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Base64 of the hash, as it appears in the serialized secret
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Check whether raw secret bytes encode to exactly this value
    pub fn matches(&self, raw: &[u8]) -> bool {
        STANDARD.encode(raw) == self.encoded
    }
}

impl std::fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncodedHash(<redacted>)")
    }
}
