// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::PasswordHasher;
use crate::constants::hashing::COST;
use crate::error::{Result, RotateError};
use bcrypt::Version;

/// In-process bcrypt, emitting the same `$2y$` form htpasswd does
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    fn hash(&self, password: &str) -> Result<String> {
        let parts = bcrypt::hash_with_result(password, self.cost)
            .map_err(|e| RotateError::HashFailed(e.to_string()))?;
        Ok(parts.format_for_version(Version::TwoY))
    }
}
