// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Dependency matching, digest computation and drift correction.

pub mod digest;
pub mod matcher;
pub mod patcher;
pub mod reconciler;

pub use digest::Digest;
pub use matcher::match_key;
pub use patcher::WorkloadPatcher;
pub use reconciler::{drift_check, ReconcileDecision, Reconciler, SweepReport};
