// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Linear rotation workflow: validate, hash, back up, patch, rewrite, apply,
//! verify, restart.
//!
//! Every step runs once. A fatal error aborts the run; steps that are only
//! best-effort (the config map patch and the rollout wait) log a warning and
//! the run continues. Nothing is rolled back automatically, fatal errors raised
//! after the backup carry the command that restores it.

use super::rewrite::{rewrite_backup, RewriteAction};
use super::workspace::Workspace;
use crate::config::Config;
use crate::error::{Result, RotateError};
use crate::kubernetes::{
    enable_account, get_secret, namespace_exists, read_secret_field, replace_secret,
    restart_deployment, wait_for_rollout, ConfigPatchOutcome, RolloutWait,
};
use crate::password::{EncodedHash, PasswordHasher};
use crate::types::{AccountCredential, Username};
use kube::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Workflow stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Hash,
    Backup,
    PatchConfig,
    RewriteSecret,
    Apply,
    VerifyField,
    Restart,
    AwaitRollout,
    FinalVerify,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Hash => "hash",
            Stage::Backup => "backup",
            Stage::PatchConfig => "patch-config",
            Stage::RewriteSecret => "rewrite-secret",
            Stage::Apply => "apply",
            Stage::VerifyField => "verify-field",
            Stage::Restart => "restart",
            Stage::AwaitRollout => "await-rollout",
            Stage::FinalVerify => "final-verify",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a completed run did
#[derive(Debug)]
pub struct RotationReport {
    /// `None` on a dry run
    pub config_patch: Option<ConfigPatchOutcome>,
    pub rewrite: RewriteAction,
    /// `None` on a dry run
    pub rollout: Option<RolloutWait>,
    pub dry_run: bool,
}

/// Request-scoped context for one password rotation
pub struct Rotation {
    client: Client,
    config: Config,
    hasher: Box<dyn PasswordHasher>,
}

impl Rotation {
    pub fn new(client: Client, config: Config, hasher: Box<dyn PasswordHasher>) -> Self {
        Self {
            client,
            config,
            hasher,
        }
    }

    #[instrument(skip(self, credential), fields(user = %credential.username, namespace = %self.config.namespace))]
    pub async fn run(&self, credential: &AccountCredential) -> Result<RotationReport> {
        let username = &credential.username;

        self.validate().await?;

        info!(stage = %Stage::Hash, "Hashing password with {} hasher", self.hasher.name());
        let raw = self.hasher.hash(credential.password())?;
        let hash = EncodedHash::from_hash(&raw)?;

        info!(stage = %Stage::Backup, "Backing up secret {}", self.config.secret_name);
        let live = get_secret(&self.client, &self.config.namespace, &self.config.secret_name)
            .await
            .map_err(|e| RotateError::BackupFailed(e.to_string()))?;
        let workspace = Workspace::create()?;
        let backup = workspace.write_backup(&live, &self.config.secret_name)?;

        let config_patch = if self.config.dry_run {
            info!(stage = %Stage::PatchConfig, "Dry run, not patching {}", self.config.config_map_name);
            None
        } else {
            Some(self.patch_config(username).await)
        };

        info!(stage = %Stage::RewriteSecret, "Rewriting {}", username.password_key());
        let output = workspace.rewritten_path(&self.config.secret_name);
        let (rewritten, rewrite) = rewrite_backup(&backup, &output, username, &hash)?;

        if self.config.dry_run {
            info!(
                "Dry run, would replace secret {}/{} with {} ({:?} {})",
                self.config.namespace,
                self.config.secret_name,
                output.display(),
                rewrite,
                username.password_key()
            );
            return Ok(RotationReport {
                config_patch,
                rewrite,
                rollout: None,
                dry_run: true,
            });
        }

        info!(stage = %Stage::Apply, "Replacing secret {}", self.config.secret_name);
        if let Err(e) = replace_secret(&self.client, &self.config.namespace, &rewritten).await {
            return Err(abort(workspace, &backup, |backup| RotateError::ApplyFailed {
                reason: e.to_string(),
                backup,
            }));
        }

        info!(stage = %Stage::VerifyField, "Verifying {}", username.password_key());
        if let Err(reason) = self.verify_field(username, &hash).await {
            return Err(abort(workspace, &backup, |backup| RotateError::VerifyFailed {
                reason,
                backup,
            }));
        }

        // The secret is verified, the backup is no longer needed
        drop(workspace);

        info!(stage = %Stage::Restart, "Restarting deployment {}", self.config.deployment_name);
        restart_deployment(&self.client, &self.config.namespace, &self.config.deployment_name)
            .await?;

        info!(
            stage = %Stage::AwaitRollout,
            "Waiting up to {:?} for the rollout to finish",
            self.config.rollout_timeout
        );
        let rollout = wait_for_rollout(
            &self.client,
            &self.config.namespace,
            &self.config.deployment_name,
            self.config.rollout_timeout,
            self.config.rollout_poll_interval,
        )
        .await;
        match &rollout {
            RolloutWait::Complete => info!("Rollout of {} complete", self.config.deployment_name),
            RolloutWait::TimedOut => warn!(
                "Rollout of {} did not finish within {:?}, it may still be in progress",
                self.config.deployment_name, self.config.rollout_timeout
            ),
            RolloutWait::Unknown(reason) => warn!(
                "Could not follow the rollout of {}: {}",
                self.config.deployment_name, reason
            ),
        }

        sleep(self.config.settle_delay).await;
        info!(stage = %Stage::FinalVerify, "Checking {} is present", username.password_key());
        self.final_check(username).await?;

        info!(stage = %Stage::Done, "Password for account '{}' rotated", username);
        Ok(RotationReport {
            config_patch,
            rewrite,
            rollout: Some(rollout),
            dry_run: false,
        })
    }

    async fn validate(&self) -> Result<()> {
        info!(stage = %Stage::Validate, "Running pre-flight checks");

        self.hasher.ensure_available()?;

        if !namespace_exists(&self.client, &self.config.namespace).await? {
            return Err(RotateError::NamespaceMissing(self.config.namespace.clone()));
        }

        get_secret(&self.client, &self.config.namespace, &self.config.secret_name).await?;
        debug!("Pre-flight checks passed");
        Ok(())
    }

    async fn patch_config(&self, username: &Username) -> ConfigPatchOutcome {
        let outcome = enable_account(
            &self.client,
            &self.config.namespace,
            &self.config.config_map_name,
            username,
        )
        .await;

        match &outcome {
            ConfigPatchOutcome::AppliedNew => info!(
                stage = %Stage::PatchConfig,
                "Enabled account {} in {}", username, self.config.config_map_name
            ),
            ConfigPatchOutcome::Conflict(reason) => warn!(
                stage = %Stage::PatchConfig,
                "Account entry not changed ({}), continuing", reason
            ),
            ConfigPatchOutcome::TransportError(e) => warn!(
                stage = %Stage::PatchConfig,
                "Unexpected error patching {}: {}, continuing", self.config.config_map_name, e
            ),
        }
        outcome
    }

    /// Compare the live field with the expected hash, returning the mismatch reason
    async fn verify_field(
        &self,
        username: &Username,
        hash: &EncodedHash,
    ) -> std::result::Result<(), String> {
        let field = read_secret_field(
            &self.client,
            &self.config.namespace,
            &self.config.secret_name,
            &username.password_key(),
        )
        .await
        .map_err(|e| format!("cannot read back secret: {}", e))?;

        match field {
            Some(value) if hash.matches(&value) => {
                debug!("Live {} matches", username.password_key());
                Ok(())
            }
            Some(_) => Err(format!("live {} does not match", username.password_key())),
            None => Err(format!("live secret has no {}", username.password_key())),
        }
    }

    async fn final_check(&self, username: &Username) -> Result<()> {
        let field = read_secret_field(
            &self.client,
            &self.config.namespace,
            &self.config.secret_name,
            &username.password_key(),
        )
        .await
        .map_err(|e| RotateError::FinalCheckFailed(e.to_string()))?;

        match field {
            Some(value) if !value.is_empty() => Ok(()),
            _ => Err(RotateError::FinalCheckFailed(format!(
                "{} missing from secret {}",
                username.password_key(),
                self.config.secret_name
            ))),
        }
    }
}

/// Keep the work dir so the backup survives, and build the fatal error
fn abort(
    workspace: Workspace,
    backup: &Path,
    make_error: impl FnOnce(PathBuf) -> RotateError,
) -> RotateError {
    let kept = workspace.keep();
    let err = make_error(backup.to_path_buf());
    error!("Backup kept in {}", kept.display());
    err
}
