// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resumable change watch for one source kind in one namespace.

use crate::constants::LATEST_RESOURCE_VERSION;
use crate::kubernetes::{ClusterApi, SourceEvent, WatchStream};
use crate::sync::Reconciler;
use crate::types::SourceKind;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

enum WatchState {
    Subscribing,
    Streaming(WatchStream),
    Backoff,
    Stopped,
}

/// Watches ConfigMaps or Secrets and checks dependents of every modified or
/// deleted object.
///
/// Runs until its cancellation token fires. An expired watch position
/// triggers an immediate resubscribe from the latest state; any other stream
/// error pauses for the backoff interval first.
pub struct WatchStreamManager {
    api: Arc<dyn ClusterApi>,
    reconciler: Arc<Reconciler>,
    kind: SourceKind,
    backoff: Duration,
    resource_version: String,
}

impl WatchStreamManager {
    pub fn new(
        api: Arc<dyn ClusterApi>,
        reconciler: Arc<Reconciler>,
        kind: SourceKind,
        backoff: Duration,
    ) -> Self {
        Self {
            api,
            reconciler,
            kind,
            backoff,
            resource_version: LATEST_RESOURCE_VERSION.to_string(),
        }
    }

    #[instrument(skip(self, token), fields(kind = %self.kind, namespace = %self.reconciler.namespace()))]
    pub async fn run(mut self, token: CancellationToken) {
        info!("Watching for {} changes", self.kind);

        let mut state = WatchState::Subscribing;
        loop {
            state = match state {
                WatchState::Subscribing => self.subscribe(&token).await,
                WatchState::Streaming(stream) => self.stream(stream, &token).await,
                WatchState::Backoff => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => WatchState::Stopped,
                        _ = tokio::time::sleep(self.backoff) => WatchState::Subscribing,
                    }
                }
                WatchState::Stopped => break,
            };
        }

        info!("Stopped watching {} changes", self.kind);
    }

    async fn subscribe(&mut self, token: &CancellationToken) -> WatchState {
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return WatchState::Stopped,
            result = self.api.subscribe(self.kind, self.reconciler.namespace(), &self.resource_version) => result,
        };

        match result {
            Ok(stream) => {
                debug!("Subscribed from resource version {}", self.resource_version);
                WatchState::Streaming(stream)
            }
            Err(e) if e.is_expired() => self.resync(),
            Err(e) => {
                error!(
                    "Unexpected error watching {}: {}, retrying in {:?}",
                    self.kind, e, self.backoff
                );
                WatchState::Backoff
            }
        }
    }

    async fn stream(&mut self, mut stream: WatchStream, token: &CancellationToken) -> WatchState {
        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => return WatchState::Stopped,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(event)) => self.handle_event(event).await,
                Some(Err(e)) if e.is_expired() => return self.resync(),
                Some(Err(e)) => {
                    error!(
                        "Unexpected error watching {}: {}, retrying in {:?}",
                        self.kind, e, self.backoff
                    );
                    return WatchState::Backoff;
                }
                None => {
                    debug!(
                        "{} watch closed by server, resuming from {}",
                        self.kind, self.resource_version
                    );
                    return WatchState::Subscribing;
                }
            }
        }
    }

    /// Expired positions are routine; restart from the latest state without backoff.
    fn resync(&mut self) -> WatchState {
        info!(
            "{} watch position {} expired, resyncing from latest state",
            self.kind, self.resource_version
        );
        self.resource_version = LATEST_RESOURCE_VERSION.to_string();
        WatchState::Subscribing
    }

    async fn handle_event(&mut self, event: SourceEvent) {
        if let Some(version) = &event.resource_version {
            self.resource_version.clone_from(version);
        }

        if !event.is_relevant() {
            return;
        }

        info!(
            "Detected {:?} event on {} {}",
            event.event_type, self.kind, event.name
        );
        if let Err(e) = self.reconciler.check_dependents(self.kind, &event.name).await {
            error!(
                "Failed to check dependents of {} {}: {}",
                self.kind, event.name, e
            );
        }
    }
}
