// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reading and replacing the Argo CD secret

use crate::error::{Result, RotateError};
use k8s_openapi::api::core::v1::Secret;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, info, instrument};

/// Get a secret, mapping a 404 to [`RotateError::SecretMissing`]
#[instrument(skip(client))]
pub async fn get_secret(client: &Client, namespace: &str, name: &str) -> Result<Secret> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    match secrets.get(name).await {
        Ok(secret) => {
            debug!(
                "Read secret {}/{} at resourceVersion {}",
                namespace,
                name,
                secret.resource_version().unwrap_or_default()
            );
            Ok(secret)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => Err(RotateError::SecretMissing {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Replace the live secret with the given document.
///
/// The document's resourceVersion is sent along, so the API server rejects the
/// replace with a conflict when the secret changed since it was read.
#[instrument(skip(client, secret), fields(secret = %secret.name_any()))]
pub async fn replace_secret(client: &Client, namespace: &str, secret: &Secret) -> Result<Secret> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let name = secret.name_any();

    let replaced = secrets
        .replace(&name, &PostParams::default(), secret)
        .await?;

    info!("Replaced secret {}/{}", namespace, name);
    Ok(replaced)
}

/// Read a single data field of the live secret, `None` when the key is absent
#[instrument(skip(client))]
pub async fn read_secret_field(
    client: &Client,
    namespace: &str,
    name: &str,
    key: &str,
) -> Result<Option<Vec<u8>>> {
    let secret = get_secret(client, namespace, name).await?;

    Ok(secret
        .data
        .and_then(|mut data| data.remove(key))
        .map(|value| value.0))
}
