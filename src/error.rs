// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::SourceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HashrollError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("{kind} {name} not found")]
    NotFound { kind: SourceKind, name: String },

    /// The watch position is no longer valid on the server (HTTP 410 Gone)
    #[error("Watch position expired: {0}")]
    Expired(String),

    #[error("Watch stream error: {0}")]
    StreamError(String),
}

impl HashrollError {
    /// Map a kube client error into the watch/read taxonomy
    pub fn from_kube(err: kube::Error, kind: SourceKind, name: &str) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => HashrollError::NotFound {
                kind,
                name: name.to_string(),
            },
            kube::Error::Api(resp) if resp.code == 410 => HashrollError::Expired(resp.message),
            other => HashrollError::KubeError(other),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, HashrollError::Expired(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HashrollError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, HashrollError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: String::new(),
            code,
        })
    }

    #[test]
    fn test_from_kube_maps_404_to_not_found() {
        let err = HashrollError::from_kube(api_error(404, "gone"), SourceKind::ConfigData, "cfg");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "configmap cfg not found");
    }

    #[test]
    fn test_from_kube_maps_410_to_expired() {
        let err = HashrollError::from_kube(
            api_error(410, "too old resource version"),
            SourceKind::SecretData,
            "",
        );
        assert!(err.is_expired());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_kube_keeps_other_api_errors() {
        let err = HashrollError::from_kube(api_error(500, "boom"), SourceKind::SecretData, "s");
        assert!(matches!(err, HashrollError::KubeError(_)));
    }
}
