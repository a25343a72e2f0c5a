// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Scoped working directory holding the secret backup and the rewritten document

use crate::error::{Result, RotateError};
use chrono::Local;
use k8s_openapi::api::core::v1::Secret;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const PREFIX: &str = "argocd-passwd-";

/// Temporary directory removed on drop unless [`Workspace::keep`] is called
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir()
            .map_err(|e| RotateError::BackupFailed(format!("cannot create work dir: {}", e)))?;
        debug!("Created work dir {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the secret unmodified to a timestamped backup file
    pub fn write_backup(&self, secret: &Secret, secret_name: &str) -> Result<PathBuf> {
        let file = format!(
            "{}-backup-{}.yaml",
            secret_name,
            Local::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.path().join(file);

        write_document(&path, secret).map_err(|e| RotateError::BackupFailed(e.to_string()))?;

        info!("Backed up secret {} to {}", secret_name, path.display());
        Ok(path)
    }

    /// Path the rewritten document is written to
    pub fn rewritten_path(&self, secret_name: &str) -> PathBuf {
        self.path().join(format!("{}-new.yaml", secret_name))
    }

    /// Leave the directory on disk and return its path
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

/// Serialize a secret to YAML on disk
pub fn write_document(path: &Path, secret: &Secret) -> std::io::Result<()> {
    let yaml = serde_yaml::to_string(secret)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, yaml)
}

/// Parse a secret back from a YAML document on disk
pub fn read_document(path: &Path) -> std::io::Result<Secret> {
    let yaml = fs::read_to_string(path)?;
    serde_yaml::from_str(&yaml).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::secret_json;

    fn secret() -> Secret {
        serde_json::from_str(&secret_json(
            "argocd",
            "argocd-secret",
            &[("admin.password", "$2a$10$abc"), ("server.secretkey", "s3cr3t")],
        ))
        .unwrap()
    }

    #[test]
    fn test_backup_round_trips_secret() {
        let workspace = Workspace::create().unwrap();

        let path = workspace.write_backup(&secret(), "argocd-secret").unwrap();

        assert!(path.starts_with(workspace.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("argocd-secret-backup-"));
        assert!(name.ends_with(".yaml"));
        assert_eq!(read_document(&path).unwrap(), secret());
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let workspace = Workspace::create().unwrap();
        let path = workspace.path().to_path_buf();

        drop(workspace);

        assert!(!path.exists());
    }

    #[test]
    fn test_keep_leaves_directory() {
        let workspace = Workspace::create().unwrap();
        let backup = workspace.write_backup(&secret(), "argocd-secret").unwrap();

        let dir = workspace.keep();

        assert!(backup.exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_read_document_rejects_garbage() {
        let workspace = Workspace::create().unwrap();
        let path = workspace.path().join("broken.yaml");
        fs::write(&path, "data: [unterminated").unwrap();

        assert!(read_document(&path).is_err());
    }
}
