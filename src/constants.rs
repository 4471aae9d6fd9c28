// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Pod template annotation keys used by hashroll
pub mod annotations {
    /// Suffix joining the source kind token and the source name, e.g. `configmap-hash/my-config`
    pub const HASH_SEPARATOR: &str = "-hash/";
}

/// Digest value stored when a source has no data (never valid hex output)
pub const NO_DATA_DIGEST: &str = "no-data";

/// Resource version that starts a watch from the most recent state
pub const LATEST_RESOURCE_VERSION: &str = "0";

/// Watch and resync timing defaults
pub mod timing {
    /// Pause after a transient watch error before resubscribing
    pub const WATCH_BACKOFF_SECS: u64 = 5;
    /// Interval between periodic full sweeps (0 disables them)
    pub const RESYNC_INTERVAL_SECS: u64 = 300;
}

/// Namespace used when neither WATCH_NAMESPACE nor POD_NAMESPACE is set
pub const DEFAULT_NAMESPACE: &str = "default";
