// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Startup sweep and lifecycle of the watch and resync tasks.

use crate::config::Config;
use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::sync::Reconciler;
use crate::types::SourceKind;
use crate::watch::stream::WatchStreamManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

/// Owns every long running task of the controller.
///
/// All tasks share one cancellation token; [`Supervisor::shutdown`] cancels it
/// and joins them. In-flight reconciles finish before their task exits.
pub struct Supervisor {
    token: CancellationToken,
    tasks: JoinSet<()>,
}

impl Supervisor {
    /// Sweep all workloads once, then start one watcher per source kind and,
    /// when configured, the periodic resync.
    ///
    /// Fails without starting anything if the startup sweep cannot list workloads.
    pub async fn start(api: Arc<dyn ClusterApi>, config: &Config) -> Result<Self> {
        let reconciler = Arc::new(Reconciler::new(api.clone(), config.namespace.clone()));

        info!("Running startup sweep in namespace {}", config.namespace);
        reconciler.full_sweep().await?;

        let token = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for kind in SourceKind::ALL {
            let manager =
                WatchStreamManager::new(api.clone(), reconciler.clone(), kind, config.watch_backoff);
            tasks.spawn(manager.run(token.child_token()));
        }

        if let Some(period) = config.resync_interval {
            tasks.spawn(periodic_sweep(reconciler, period, token.child_token()));
        }

        Ok(Self { token, tasks })
    }

    /// Cancel all tasks and wait for them to exit.
    pub async fn shutdown(mut self) {
        info!("Shutting down {} tasks", self.tasks.len());
        self.token.cancel();

        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                error!("Task terminated abnormally: {}", e);
            }
        }

        info!("All tasks stopped");
    }
}

/// Re-run the full sweep every `period` until cancelled.
#[instrument(skip(reconciler, token))]
async fn periodic_sweep(reconciler: Arc<Reconciler>, period: Duration, token: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if let Err(e) = reconciler.full_sweep().await {
            error!("Periodic sweep failed: {}", e);
        }
    }
}
