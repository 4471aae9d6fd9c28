// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain types for configuration sources and the workloads depending on them.

pub mod source;
pub mod workload;

pub use source::{ConfigSource, SourceKind};
pub use workload::{DependencyKey, Workload};
