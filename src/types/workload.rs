// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::annotations::HASH_SEPARATOR;
use crate::sync::matcher::match_key;
use crate::types::SourceKind;
use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// A declared dependency of a workload on a ConfigMap or Secret
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    pub kind: SourceKind,
    pub name: String,
}

impl DependencyKey {
    pub fn new(kind: SourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// The pod template annotation key declaring this dependency
    pub fn annotation_key(&self) -> String {
        format!("{}{}{}", self.kind.as_str(), HASH_SEPARATOR, self.name)
    }
}

/// A Deployment reduced to what reconciliation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub namespace: String,
    pub name: String,
    /// Pod template annotations (`spec.template.metadata.annotations`)
    pub annotations: BTreeMap<String, String>,
}

impl Workload {
    /// Dependencies declared on the pod template, keyed by their annotation key
    pub fn dependencies(&self) -> Vec<(String, DependencyKey)> {
        self.annotations
            .keys()
            .filter_map(|key| match_key(key).map(|dep| (key.clone(), dep)))
            .collect()
    }

    pub fn has_dependencies(&self) -> bool {
        self.annotations.keys().any(|key| match_key(key).is_some())
    }
}

impl From<&Deployment> for Workload {
    fn from(deployment: &Deployment) -> Self {
        let annotations = deployment
            .spec
            .as_ref()
            .and_then(|s| s.template.metadata.as_ref())
            .and_then(|m| m.annotations.clone())
            .unwrap_or_default();

        Workload {
            namespace: deployment.namespace().unwrap_or_default(),
            name: deployment.name_any(),
            annotations,
        }
    }
}
