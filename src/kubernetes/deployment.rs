// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rolling restart of the Argo CD server and rollout status polling

use crate::constants::{rollout::RESTARTED_AT_ANNOTATION, FIELD_MANAGER};
use crate::error::{Result, RotateError};
use chrono::{SecondsFormat, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

/// How the wait for a rollout ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloutWait {
    Complete,
    TimedOut,
    /// Polling the deployment failed, the restart may still be progressing
    Unknown(String),
}

/// Trigger a rolling restart the way `kubectl rollout restart` does, by stamping
/// the pod template with a restartedAt annotation
#[instrument(skip(client))]
pub async fn restart_deployment(client: &Client, namespace: &str, name: &str) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let restarted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let patch = serde_json::json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": BTreeMap::from([(RESTARTED_AT_ANNOTATION, restarted_at.as_str())])
                }
            }
        }
    });

    deployments
        .patch(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
        .map_err(|e| RotateError::RestartFailed(name.to_string(), e))?;

    info!("Triggered rolling restart of deployment {}/{}", namespace, name);
    Ok(())
}

/// Poll the deployment until the rollout completed or `limit` elapsed
#[instrument(skip(client))]
pub async fn wait_for_rollout(
    client: &Client,
    namespace: &str,
    name: &str,
    limit: Duration,
    poll_interval: Duration,
) -> RolloutWait {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);

    let poll = async {
        loop {
            match deployments.get(name).await {
                Ok(deployment) if rollout_complete(&deployment) => return RolloutWait::Complete,
                Ok(_) => debug!(
                    "Deployment {}/{} still rolling out, checking again in {:?}",
                    namespace, name, poll_interval
                ),
                Err(e) => {
                    warn!("Failed to read deployment {}/{}: {}", namespace, name, e);
                    return RolloutWait::Unknown(e.to_string());
                }
            }
            sleep(poll_interval).await;
        }
    };

    timeout(limit, poll).await.unwrap_or(RolloutWait::TimedOut)
}

/// Same completion rule `kubectl rollout status` applies
pub fn rollout_complete(deployment: &Deployment) -> bool {
    let Some(status) = deployment.status.as_ref() else {
        return false;
    };

    let generation = deployment.metadata.generation.unwrap_or(0);
    if status.observed_generation.unwrap_or(0) < generation {
        return false;
    }

    let desired = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    let updated = status.updated_replicas.unwrap_or(0);
    let total = status.replicas.unwrap_or(0);
    let available = status.available_replicas.unwrap_or(0);

    updated >= desired && total <= updated && available >= updated
}
