// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Account enablement in the Argo CD config map

use crate::constants::{account::CAPABILITIES, FIELD_MANAGER};
use crate::types::Username;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// Result of the best-effort config map patch
#[derive(Debug)]
pub enum ConfigPatchOutcome {
    /// The account entry was added or its capabilities changed
    AppliedNew,
    /// The entry already carried the capabilities, or the API reported a conflict
    Conflict(String),
    /// Anything else went wrong talking to the API server
    TransportError(kube::Error),
}

impl fmt::Display for ConfigPatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigPatchOutcome::AppliedNew => f.write_str("applied"),
            ConfigPatchOutcome::Conflict(reason) => write!(f, "conflict: {}", reason),
            ConfigPatchOutcome::TransportError(e) => write!(f, "transport error: {}", e),
        }
    }
}

/// Merge `accounts.<username>: apiKey,login` into the config map
#[instrument(skip(client))]
pub async fn enable_account(
    client: &Client,
    namespace: &str,
    name: &str,
    username: &Username,
) -> ConfigPatchOutcome {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let key = username.enablement_key();

    let current = match config_maps.get(name).await {
        Ok(cm) => cm,
        Err(e) => return classify(e),
    };

    let existing = current.data.as_ref().and_then(|d| d.get(&key));
    if existing.is_some_and(|v| v == CAPABILITIES) {
        debug!("{} already set to {}", key, CAPABILITIES);
        return ConfigPatchOutcome::Conflict(format!("{} already exists", key));
    }

    let patch = serde_json::json!({
        "data": BTreeMap::from([(key.as_str(), CAPABILITIES)])
    });

    match config_maps
        .patch(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
    {
        Ok(_) => ConfigPatchOutcome::AppliedNew,
        Err(e) => classify(e),
    }
}

fn classify(error: kube::Error) -> ConfigPatchOutcome {
    match error {
        kube::Error::Api(err) if err.code == 409 => ConfigPatchOutcome::Conflict(err.message),
        e => ConfigPatchOutcome::TransportError(e),
    }
}
