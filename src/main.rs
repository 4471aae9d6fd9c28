// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use hashroll::config::Config;
use hashroll::kubernetes::KubeClusterApi;
use hashroll::watch::Supervisor;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting hashroll controller");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, watch_backoff={:?}, resync_interval={:?}",
        config.namespace, config.watch_backoff, config.resync_interval
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let api = Arc::new(KubeClusterApi::new(client));

    // Correct drift accumulated while we were not running, then start watching
    let supervisor = Supervisor::start(api, &config).await?;

    info!(
        "Watching for ConfigMap & Secret changes in namespace: {}",
        config.namespace
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received interrupt"),
        _ = sigterm.recv() => info!("Received SIGTERM"),
    }

    supervisor.shutdown().await;
    Ok(())
}
