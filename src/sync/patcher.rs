// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rolling a workload by rewriting its pod template annotations.

use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::types::Workload;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Applies annotation updates to workloads.
///
/// The annotation map passed to [`WorkloadPatcher::patch`] is the complete
/// desired set, not a delta. Changing it changes the pod template hash, which
/// makes the Deployment controller roll new pods.
#[derive(Clone)]
pub struct WorkloadPatcher {
    api: Arc<dyn ClusterApi>,
}

impl WorkloadPatcher {
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        Self { api }
    }

    /// Patch the workload once. Failures are logged and returned; there is no retry,
    /// the next sweep or event detects the drift again.
    #[instrument(skip(self, workload, annotations), fields(workload = %format!("{}/{}", workload.namespace, workload.name)))]
    pub async fn patch(
        &self,
        workload: &Workload,
        annotations: &BTreeMap<String, String>,
    ) -> Result<()> {
        info!("Patching deployment to update dependency annotations");

        self.api
            .patch_workload_annotations(&workload.namespace, &workload.name, annotations)
            .await
            .inspect_err(|e| error!("Failed to patch deployment: {}", e))
    }
}
