// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster API access used by the reconciler and the watchers.

use crate::error::{HashrollError, Result};
use crate::kubernetes::events::{convert_watch_event, WatchStream};
use crate::types::{ConfigSource, SourceKind, Workload};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{
    api::{ListParams, Patch, PatchParams, WatchParams},
    Api, Client, Resource,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, instrument};

#[cfg(test)]
use mockall::automock;

/// Operations hashroll needs from the cluster.
///
/// Injected into every component so tests can substitute a mock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List all Deployments in a namespace
    async fn list_workloads(&self, namespace: &str) -> Result<Vec<Workload>>;

    /// Read a ConfigMap or Secret; a missing object is [`HashrollError::NotFound`]
    async fn read_config_source(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<ConfigSource>;

    /// Open a change stream for one kind, starting after `resource_version`
    async fn subscribe(
        &self,
        kind: SourceKind,
        namespace: &str,
        resource_version: &str,
    ) -> Result<WatchStream>;

    /// Replace a Deployment's pod template annotations
    async fn patch_workload_annotations(
        &self,
        namespace: &str,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<()>;
}

/// [`ClusterApi`] backed by a kube client
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    #[instrument(skip(self))]
    async fn list_workloads(&self, namespace: &str) -> Result<Vec<Workload>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let list = deployments.list(&ListParams::default()).await?;

        debug!("Listed {} deployments", list.items.len());
        Ok(list.items.iter().map(Workload::from).collect())
    }

    #[instrument(skip(self))]
    async fn read_config_source(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<ConfigSource> {
        match kind {
            SourceKind::ConfigData => {
                let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
                let cm = api
                    .get(name)
                    .await
                    .map_err(|e| HashrollError::from_kube(e, kind, name))?;
                Ok(ConfigSource::from(&cm))
            }
            SourceKind::SecretData => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
                let secret = api
                    .get(name)
                    .await
                    .map_err(|e| HashrollError::from_kube(e, kind, name))?;
                Ok(ConfigSource::from(&secret))
            }
        }
    }

    #[instrument(skip(self))]
    async fn subscribe(
        &self,
        kind: SourceKind,
        namespace: &str,
        resource_version: &str,
    ) -> Result<WatchStream> {
        match kind {
            SourceKind::ConfigData => {
                let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
                watch_sources(api, kind, resource_version).await
            }
            SourceKind::SecretData => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
                watch_sources(api, kind, resource_version).await
            }
        }
    }

    #[instrument(skip(self, annotations))]
    async fn patch_workload_annotations(
        &self,
        namespace: &str,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<()> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let patch = annotations_patch(annotations);

        deployments
            .patch(name, &PatchParams::default(), &Patch::Strategic(&patch))
            .await?;
        Ok(())
    }
}

async fn watch_sources<K>(api: Api<K>, kind: SourceKind, resource_version: &str) -> Result<WatchStream>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
{
    let stream = api
        .watch(&WatchParams::default(), resource_version)
        .await
        .map_err(|e| HashrollError::from_kube(e, kind, ""))?;

    Ok(stream
        .map_err(move |e| HashrollError::from_kube(e, kind, ""))
        .and_then(|event| futures::future::ready(convert_watch_event(event)))
        .boxed())
}

/// Strategic merge patch body setting the full pod template annotation map
fn annotations_patch(annotations: &BTreeMap<String, String>) -> serde_json::Value {
    serde_json::json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": annotations
                }
            }
        }
    })
}
