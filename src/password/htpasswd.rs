// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! bcrypt through the Apache `htpasswd` utility.

use super::PasswordHasher;
use crate::constants::hashing::COST;
use crate::error::{Result, RotateError};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

const BINARY: &str = "htpasswd";

/// Package managers tried in order, with the package that ships `htpasswd`
const INSTALLERS: &[(&str, &[&str])] = &[
    ("apt-get", &["install", "-y", "apache2-utils"]),
    ("dnf", &["install", "-y", "httpd-tools"]),
    ("yum", &["install", "-y", "httpd-tools"]),
    ("apk", &["add", "--no-cache", "apache2-utils"]),
    ("brew", &["install", "httpd"]),
];

pub struct HtpasswdHasher {
    binary: String,
}

impl HtpasswdHasher {
    pub fn new() -> Self {
        Self {
            binary: BINARY.to_string(),
        }
    }

    #[cfg(test)]
    fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Install htpasswd with the first package manager found on PATH
    fn install(&self) -> Result<()> {
        let Some((manager, args)) = INSTALLERS.iter().find(|(m, _)| binary_exists(m)) else {
            return Err(RotateError::HasherUnavailable(format!(
                "{} not found and no supported package manager available",
                self.binary
            )));
        };

        if *manager == "apt-get" {
            // Stale package lists make the install fail on fresh images
            let _ = Command::new(manager)
                .arg("update")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }

        info!("Installing {} with {} {}", self.binary, manager, args.join(" "));
        let status = Command::new(manager)
            .args(*args)
            .stdout(Stdio::null())
            .status()
            .map_err(|e| {
                RotateError::HasherUnavailable(format!("failed to run {}: {}", manager, e))
            })?;

        if !status.success() {
            return Err(RotateError::HasherUnavailable(format!(
                "{} exited with {}",
                manager, status
            )));
        }
        Ok(())
    }
}

impl Default for HtpasswdHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for HtpasswdHasher {
    fn name(&self) -> &'static str {
        "htpasswd"
    }

    fn ensure_available(&self) -> Result<()> {
        if binary_exists(&self.binary) {
            debug!("{} found on PATH", self.binary);
            return Ok(());
        }

        warn!("{} not found, attempting to install it", self.binary);
        self.install()?;

        if binary_exists(&self.binary) {
            Ok(())
        } else {
            Err(RotateError::HasherUnavailable(format!(
                "{} still not available after install",
                self.binary
            )))
        }
    }

    fn hash(&self, password: &str) -> Result<String> {
        // -n print, -i password on stdin, -B bcrypt, -C cost, empty user name
        let cost = COST.to_string();
        let mut child = Command::new(&self.binary)
            .args(["-niBC", cost.as_str(), ""])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RotateError::HashFailed(format!("failed to run {}: {}", self.binary, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(password.as_bytes())
                .map_err(|e| RotateError::HashFailed(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| RotateError::HashFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(RotateError::HashFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// htpasswd prints `user:hash` followed by blank lines, the user is empty here
fn parse_output(stdout: &str) -> String {
    stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().trim_start_matches(':').to_string())
        .unwrap_or_default()
}

/// Check if a binary is available in PATH
fn binary_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_strips_empty_user() {
        let stdout = ":$2y$10$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234\n\n";
        assert_eq!(
            parse_output(stdout),
            "$2y$10$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234"
        );
    }

    #[test]
    fn test_parse_output_empty() {
        assert_eq!(parse_output("\n\n"), "");
    }

    #[test]
    fn test_hash_with_missing_binary_fails() {
        let hasher = HtpasswdHasher::with_binary("definitely-not-htpasswd-4b1e");
        assert!(matches!(
            hasher.hash("hunter2"),
            Err(RotateError::HashFailed(_))
        ));
    }
}
