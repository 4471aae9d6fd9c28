// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch-driven reconciliation: per-kind change watchers and their supervisor.

pub mod stream;
pub mod supervisor;

pub use stream::WatchStreamManager;
pub use supervisor::Supervisor;
