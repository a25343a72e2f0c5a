// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::cli::Cli;
use crate::constants::{defaults, rollout};
use clap::ValueEnum;
use std::time::Duration;

/// Which implementation computes the bcrypt hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HasherKind {
    /// In-process bcrypt
    Builtin,
    /// External `htpasswd` binary, installed on demand
    Htpasswd,
}

/// Settings for a single rotation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace Argo CD is installed in
    pub namespace: String,
    pub secret_name: String,
    pub config_map_name: String,
    pub deployment_name: String,
    pub hasher: HasherKind,
    /// Upper bound for the rollout wait, exceeding it is only a warning
    pub rollout_timeout: Duration,
    pub rollout_poll_interval: Duration,
    /// Pause between the rollout and the final check of the live secret
    pub settle_delay: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Build the configuration from parsed arguments, which already include
    /// environment overrides
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            namespace: cli.namespace.clone(),
            secret_name: cli.secret_name.clone(),
            config_map_name: cli.config_map.clone(),
            deployment_name: cli.deployment.clone(),
            hasher: cli.hasher,
            rollout_timeout: Duration::from_secs(cli.rollout_timeout),
            rollout_poll_interval: Duration::from_secs(rollout::POLL_INTERVAL_SECS),
            settle_delay: Duration::from_secs(cli.settle_delay),
            dry_run: cli.dry_run,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: defaults::NAMESPACE.to_string(),
            secret_name: defaults::SECRET_NAME.to_string(),
            config_map_name: defaults::CONFIG_MAP_NAME.to_string(),
            deployment_name: defaults::SERVER_DEPLOYMENT.to_string(),
            hasher: HasherKind::Builtin,
            rollout_timeout: Duration::from_secs(rollout::TIMEOUT_SECS),
            rollout_poll_interval: Duration::from_secs(rollout::POLL_INTERVAL_SECS),
            settle_delay: Duration::from_secs(rollout::SETTLE_DELAY_SECS),
            dry_run: false,
        }
    }
}
