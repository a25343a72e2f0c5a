// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default Argo CD object names
pub mod defaults {
    /// Namespace Argo CD is installed in
    pub const NAMESPACE: &str = "argocd";
    /// Secret holding the account password hashes
    pub const SECRET_NAME: &str = "argocd-secret";
    /// ConfigMap holding the account enablement entries
    pub const CONFIG_MAP_NAME: &str = "argocd-cm";
    /// Deployment that has to be restarted to pick up the new credential
    pub const SERVER_DEPLOYMENT: &str = "argocd-server";
}

/// Account related keys and values
pub mod account {
    /// Capabilities granted to the rotated account
    pub const CAPABILITIES: &str = "apiKey,login";

    /// ConfigMap key enabling an account
    pub fn enablement_key(username: &str) -> String {
        format!("accounts.{}", username)
    }

    /// Secret key holding an account's password hash
    pub fn password_key(username: &str) -> String {
        format!("{}.password", username)
    }
}

/// Password hashing parameters
pub mod hashing {
    /// bcrypt cost factor
    pub const COST: u32 = 10;
    /// Identifier produced by htpasswd and the native bcrypt encoder
    pub const NATIVE_PREFIX: &str = "$2y$";
    /// Identifier Argo CD expects
    pub const COMPAT_PREFIX: &str = "$2a$";
}

/// Rollout restart and wait configuration
pub mod rollout {
    /// Pod template annotation stamped by `kubectl rollout restart`
    pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";
    /// Maximum time to wait for the restarted deployment to become available
    pub const TIMEOUT_SECS: u64 = 180;
    /// Interval between rollout status polls
    pub const POLL_INTERVAL_SECS: u64 = 2;
    /// Delay before the final verification of the live secret
    pub const SETTLE_DELAY_SECS: u64 = 5;
}

/// Field manager used for patches
pub const FIELD_MANAGER: &str = "argocd-passwd";
