// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The password rotation workflow and the local artifacts it produces.

pub mod rewrite;
pub mod workflow;
pub mod workspace;

pub use rewrite::{rewrite_backup, set_password_field, RewriteAction};
pub use workflow::{Rotation, RotationReport, Stage};
pub use workspace::Workspace;
