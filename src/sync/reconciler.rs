// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drift detection between workloads and the sources they depend on.

use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::sync::digest::Digest;
use crate::sync::patcher::WorkloadPatcher;
use crate::types::{DependencyKey, SourceKind, Workload};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of comparing one stored digest with the actual one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileDecision {
    Unchanged,
    /// The annotation map with the drifted key set to the actual digest
    Drifted(BTreeMap<String, String>),
}

/// Decide whether `key` in `annotations` still matches `actual`.
pub fn drift_check(
    annotations: &BTreeMap<String, String>,
    key: &str,
    actual: &Digest,
) -> ReconcileDecision {
    match annotations.get(key) {
        Some(stored) if *actual == **stored => ReconcileDecision::Unchanged,
        _ => {
            let mut updated = annotations.clone();
            updated.insert(key.to_string(), actual.to_string());
            ReconcileDecision::Drifted(updated)
        }
    }
}

/// Counters for one sweep or dependents check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Workloads carrying at least one dependency annotation
    pub workloads: usize,
    /// (workload, key) pairs compared
    pub checked: usize,
    /// Keys skipped because their source could not be read
    pub skipped: usize,
    pub patched: usize,
    pub failed: usize,
}

impl SweepReport {
    fn absorb(&mut self, other: SweepReport) {
        self.workloads += other.workloads;
        self.checked += other.checked;
        self.skipped += other.skipped;
        self.patched += other.patched;
        self.failed += other.failed;
    }
}

/// Finds workloads whose dependency digests have drifted and rolls them.
///
/// Both entry points list workloads fresh and read sources fresh; nothing is
/// cached between calls, so every call is idempotent and order-insensitive.
pub struct Reconciler {
    api: Arc<dyn ClusterApi>,
    patcher: WorkloadPatcher,
    namespace: String,
}

impl Reconciler {
    pub fn new(api: Arc<dyn ClusterApi>, namespace: impl Into<String>) -> Self {
        Self {
            patcher: WorkloadPatcher::new(api.clone()),
            api,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Check every dependency of every workload in the namespace.
    ///
    /// Only a listing failure is returned as an error.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn full_sweep(&self) -> Result<SweepReport> {
        let workloads = self.workloads_with_dependencies().await?;
        info!("Sweeping {} deployments with dependency annotations", workloads.len());

        let mut report = SweepReport::default();
        for workload in &workloads {
            report.absorb(self.reconcile_workload(workload, |_| true).await);
        }

        info!(
            checked = report.checked,
            patched = report.patched,
            skipped = report.skipped,
            failed = report.failed,
            "Sweep complete"
        );
        Ok(report)
    }

    /// Check only the `kind-hash/name` dependency on each workload; other keys are left alone.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn check_dependents(&self, kind: SourceKind, name: &str) -> Result<SweepReport> {
        let changed = DependencyKey::new(kind, name);
        let workloads = self.workloads_with_dependencies().await?;

        let mut report = SweepReport::default();
        for workload in &workloads {
            report.absorb(self.reconcile_workload(workload, |dep| *dep == changed).await);
        }

        debug!(
            checked = report.checked,
            patched = report.patched,
            "Dependents check complete"
        );
        Ok(report)
    }

    async fn workloads_with_dependencies(&self) -> Result<Vec<Workload>> {
        let workloads = self.api.list_workloads(&self.namespace).await?;
        Ok(workloads
            .into_iter()
            .filter(Workload::has_dependencies)
            .collect())
    }

    /// Drift-check the selected keys of one workload, merging every update into
    /// a single patch.
    async fn reconcile_workload<F>(&self, workload: &Workload, select: F) -> SweepReport
    where
        F: Fn(&DependencyKey) -> bool,
    {
        let selected: Vec<_> = workload
            .dependencies()
            .into_iter()
            .filter(|(_, dep)| select(dep))
            .collect();

        let mut report = SweepReport::default();
        if selected.is_empty() {
            return report;
        }
        report.workloads = 1;

        let mut annotations = workload.annotations.clone();
        let mut drifted = false;

        for (key, dep) in selected {
            report.checked += 1;
            info!(
                "Found deployment {} watching {} {}",
                workload.name, dep.kind, dep.name
            );

            let actual = match self.actual_digest(&dep).await {
                Ok(digest) => digest,
                Err(e) if e.is_not_found() => {
                    warn!(
                        "{} {} referenced by deployment {} no longer exists, leaving {} as is",
                        dep.kind, dep.name, workload.name, key
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(
                        "Failed to read {} {} for deployment {}: {}",
                        dep.kind, dep.name, workload.name, e
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            match drift_check(&annotations, &key, &actual) {
                ReconcileDecision::Unchanged => {
                    debug!(
                        "Digest for {} {} is unchanged, no action required",
                        dep.kind, dep.name
                    );
                }
                ReconcileDecision::Drifted(updated) => {
                    info!(
                        "Mismatch detected for {} {} in deployment {}",
                        dep.kind, dep.name, workload.name
                    );
                    annotations = updated;
                    drifted = true;
                }
            }
        }

        if drifted {
            match self.patcher.patch(workload, &annotations).await {
                Ok(()) => report.patched += 1,
                Err(_) => report.failed += 1,
            }
        }

        report
    }

    async fn actual_digest(&self, dep: &DependencyKey) -> Result<Digest> {
        let source = self
            .api
            .read_config_source(dep.kind, &self.namespace, &dep.name)
            .await?;
        Ok(Digest::of(source.data.as_ref()))
    }
}
