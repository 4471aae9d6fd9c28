// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{timing, DEFAULT_NAMESPACE};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Controller configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace whose Deployments, ConfigMaps and Secrets are watched
    pub namespace: String,
    /// Pause after a transient watch error before resubscribing
    pub watch_backoff: Duration,
    /// Interval between periodic full sweeps, `None` when disabled
    pub resync_interval: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("WATCH_NAMESPACE")
            .or_else(|| lookup("POD_NAMESPACE"))
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let watch_backoff_secs = parse_secs(&lookup, "WATCH_BACKOFF_SECS", timing::WATCH_BACKOFF_SECS)?;
        let resync_secs = parse_secs(&lookup, "RESYNC_INTERVAL_SECS", timing::RESYNC_INTERVAL_SECS)?;

        Ok(Config {
            namespace,
            watch_backoff: Duration::from_secs(watch_backoff_secs),
            resync_interval: (resync_secs > 0).then(|| Duration::from_secs(resync_secs)),
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, raw)),
        None => Ok(default),
    }
}
