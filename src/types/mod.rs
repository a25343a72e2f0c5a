// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain types for the rotated account.

pub mod account;

pub use account::{AccountCredential, Username};
