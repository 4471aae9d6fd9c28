// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access: the cluster API seam and watch event translation.

pub mod client;
pub mod events;

#[cfg(test)]
pub use client::MockClusterApi;
pub use client::{ClusterApi, KubeClusterApi};
pub use events::{EventType, SourceEvent, WatchStream};
