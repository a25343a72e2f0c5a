// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes calls made while rotating a password: client creation, namespace
//! lookup, secret reads and replaces, config map patching and rollout restarts.

pub mod client;
pub mod configmap;
pub mod deployment;
pub mod namespaces;
pub mod secrets;

pub use client::create_client;
pub use configmap::{enable_account, ConfigPatchOutcome};
pub use deployment::{restart_deployment, wait_for_rollout, RolloutWait};
pub use namespaces::namespace_exists;
pub use secrets::{get_secret, read_secret_field, replace_secret};
