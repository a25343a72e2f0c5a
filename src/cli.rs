// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::HasherKind;
use crate::constants::{defaults, rollout};
use clap::Parser;

/// Rotate the password of an Argo CD local account
#[derive(Parser, Debug)]
#[command(name = "argocd-passwd")]
#[command(version)]
pub struct Cli {
    /// Account to rotate the password for
    pub username: String,

    /// New plaintext password
    pub password: String,

    /// Namespace Argo CD is installed in
    #[arg(default_value = defaults::NAMESPACE)]
    pub namespace: String,

    /// How to compute the bcrypt hash
    #[arg(long, env = "PASSWORD_HASHER", value_enum, default_value_t = HasherKind::Builtin)]
    pub hasher: HasherKind,

    /// Secret holding the password hashes
    #[arg(long, env = "ARGOCD_SECRET_NAME", default_value = defaults::SECRET_NAME)]
    pub secret_name: String,

    /// ConfigMap holding the account entries
    #[arg(long, env = "ARGOCD_CM_NAME", default_value = defaults::CONFIG_MAP_NAME)]
    pub config_map: String,

    /// Deployment to restart once the secret is updated
    #[arg(long, env = "ARGOCD_SERVER_DEPLOYMENT", default_value = defaults::SERVER_DEPLOYMENT)]
    pub deployment: String,

    /// Seconds to wait for the restarted deployment to become available
    #[arg(long, env = "ROLLOUT_TIMEOUT_SECS", default_value_t = rollout::TIMEOUT_SECS)]
    pub rollout_timeout: u64,

    /// Seconds to wait before the final check of the live secret
    #[arg(long, env = "SETTLE_DELAY_SECS", default_value_t = rollout::SETTLE_DELAY_SECS)]
    pub settle_delay: u64,

    /// Hash, back up and rewrite the secret locally without changing the cluster
    #[arg(long)]
    pub dry_run: bool,
}
