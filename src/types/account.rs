// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::account;
use crate::error::{Result, RotateError};
use std::fmt;

/// Longest key Kubernetes accepts in ConfigMap and Secret data
const MAX_DATA_KEY_LEN: usize = 253;

/// An Argo CD account name that is safe to use in ConfigMap and Secret keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(RotateError::InvalidUsername("username is empty".to_string()));
        }

        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(RotateError::InvalidUsername(format!(
                "'{}' contains '{}', only [-._a-zA-Z0-9] is allowed",
                raw, c
            )));
        }

        let longest = account::password_key(raw)
            .len()
            .max(account::enablement_key(raw).len());
        if longest > MAX_DATA_KEY_LEN {
            return Err(RotateError::InvalidUsername(format!(
                "'{}' is too long for a data key",
                raw
            )));
        }

        Ok(Username(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the password hash in the Argo CD secret
    pub fn password_key(&self) -> String {
        account::password_key(&self.0)
    }

    /// Key of the account entry in the Argo CD config map
    pub fn enablement_key(&self) -> String {
        account::enablement_key(&self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Username and plaintext password supplied by the caller
#[derive(Clone)]
pub struct AccountCredential {
    pub username: Username,
    password: String,
}

impl AccountCredential {
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the plaintext out of logs
impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
