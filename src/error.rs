// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Kubernetes client unavailable: {0}")]
    ClientUnavailable(String),

    #[error("Namespace '{0}' does not exist")]
    NamespaceMissing(String),

    #[error("Secret '{name}' does not exist in namespace '{namespace}'")]
    SecretMissing { namespace: String, name: String },

    #[error("Password hasher unavailable: {0}")]
    HasherUnavailable(String),

    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Backup failed: {0}")]
    BackupFailed(String),

    #[error("Secret rewrite failed: {0}")]
    RewriteFailed(String),

    #[error("Failed to apply secret: {reason}. Restore with: {}", restore_command(.backup))]
    ApplyFailed { reason: String, backup: PathBuf },

    #[error("Verification failed: {reason}. Restore with: {}", restore_command(.backup))]
    VerifyFailed { reason: String, backup: PathBuf },

    #[error("Failed to restart deployment '{0}'")]
    RestartFailed(String, #[source] kube::Error),

    #[error("Final check failed: {0}")]
    FinalCheckFailed(String),
}

impl RotateError {
    /// Path of the backup a restore command points at, if any
    pub fn backup_path(&self) -> Option<&Path> {
        match self {
            RotateError::ApplyFailed { backup, .. } | RotateError::VerifyFailed { backup, .. } => {
                Some(backup)
            }
            _ => None,
        }
    }
}

/// Command an operator runs to put the backed up secret back
pub fn restore_command(backup: &Path) -> String {
    format!("kubectl apply -f {}", backup.display())
}

pub type Result<T> = std::result::Result<T, RotateError>;
