// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace lookup

use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};
use tracing::{debug, instrument};

/// Check whether a namespace exists in the cluster
#[instrument(skip(client))]
pub async fn namespace_exists(client: &Client, namespace: &str) -> Result<bool> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} exists", namespace);
            Ok(true)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("Namespace {} not found", namespace);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
