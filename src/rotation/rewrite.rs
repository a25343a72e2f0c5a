// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Field-level edit of the secret document

use super::workspace::{read_document, write_document};
use crate::error::{Result, RotateError};
use crate::password::EncodedHash;
use crate::types::Username;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use std::path::Path;
use tracing::info;

/// Which branch the rewrite took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteAction {
    Inserted,
    Replaced,
}

/// Set `<username>.password` in the secret data, leaving every other key alone
pub fn set_password_field(
    secret: &mut Secret,
    username: &Username,
    hash: &EncodedHash,
) -> RewriteAction {
    let data = secret.data.get_or_insert_with(Default::default);
    let previous = data.insert(
        username.password_key(),
        ByteString(hash.hash().as_bytes().to_vec()),
    );

    if previous.is_some() {
        RewriteAction::Replaced
    } else {
        RewriteAction::Inserted
    }
}

/// Load the backup, set the password field and write the result to `output`.
/// The backup file itself is never modified.
pub fn rewrite_backup(
    backup: &Path,
    output: &Path,
    username: &Username,
    hash: &EncodedHash,
) -> Result<(Secret, RewriteAction)> {
    let mut secret = read_document(backup).map_err(|e| {
        RotateError::RewriteFailed(format!("cannot read {}: {}", backup.display(), e))
    })?;

    let action = set_password_field(&mut secret, username, hash);

    write_document(output, &secret).map_err(|e| {
        RotateError::RewriteFailed(format!("cannot write {}: {}", output.display(), e))
    })?;

    info!(
        "{} {} in {}",
        match action {
            RewriteAction::Inserted => "Inserted",
            RewriteAction::Replaced => "Replaced",
        },
        username.password_key(),
        output.display()
    );
    Ok((secret, action))
}
