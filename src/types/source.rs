// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use base64::{engine::general_purpose::STANDARD, Engine};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of configuration object a workload can depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A ConfigMap
    ConfigData,
    /// A Secret
    SecretData,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::ConfigData, SourceKind::SecretData];

    /// Token used in dependency annotation keys
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ConfigData => "configmap",
            SourceKind::SecretData => "secret",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "configmap" => Some(SourceKind::ConfigData),
            "secret" => Some(SourceKind::SecretData),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named ConfigMap or Secret as read from the cluster.
///
/// `data` holds the string form of each value: ConfigMap values verbatim,
/// Secret values in their base64 wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub kind: SourceKind,
    pub namespace: String,
    pub name: String,
    pub data: Option<BTreeMap<String, String>>,
}

impl From<&ConfigMap> for ConfigSource {
    fn from(cm: &ConfigMap) -> Self {
        ConfigSource {
            kind: SourceKind::ConfigData,
            namespace: cm.namespace().unwrap_or_default(),
            name: cm.name_any(),
            data: cm.data.clone(),
        }
    }
}

impl From<&Secret> for ConfigSource {
    fn from(secret: &Secret) -> Self {
        let data = secret.data.as_ref().map(|d| {
            d.iter()
                .map(|(k, v)| (k.clone(), STANDARD.encode(&v.0)))
                .collect()
        });

        ConfigSource {
            kind: SourceKind::SecretData,
            namespace: secret.namespace().unwrap_or_default(),
            name: secret.name_any(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;

    #[test]
    fn test_kind_tokens_round_trip() {
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::from_token(kind.as_str()), Some(kind));
        }
        assert_eq!(SourceKind::from_token("deployment"), None);
    }

    #[test]
    fn test_secret_values_are_kept_in_wire_encoding() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("db".to_string()),
                namespace: Some("apps".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString(b"hunter2".to_vec()),
            )])),
            ..Default::default()
        };

        let source = ConfigSource::from(&secret);

        assert_eq!(source.kind, SourceKind::SecretData);
        assert_eq!(source.name, "db");
        assert_eq!(source.namespace, "apps");
        assert_eq!(source.data.unwrap().get("password").unwrap(), "aHVudGVyMg==");
    }

    #[test]
    fn test_config_map_without_data() {
        let cm = ConfigMap {
            metadata: ObjectMeta {
                name: Some("empty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let source = ConfigSource::from(&cm);

        assert_eq!(source.kind, SourceKind::ConfigData);
        assert!(source.data.is_none());
    }
}
