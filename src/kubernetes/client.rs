// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::error::{Result, RotateError};
use kube::{Client, Config as KConfig};
use tracing::{debug, instrument};

/// Create a Kubernetes client from the ambient kubeconfig or in-cluster config
#[instrument]
pub async fn create_client() -> Result<Client> {
    let config = KConfig::infer().await.map_err(|e| {
        RotateError::ClientUnavailable(format!("Failed to infer kubeconfig: {}", e))
    })?;

    debug!("Using cluster at {}", config.cluster_url);

    Client::try_from(config)
        .map_err(|e| RotateError::ClientUnavailable(format!("Failed to create client: {}", e)))
}
