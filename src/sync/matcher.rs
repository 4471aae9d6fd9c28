// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Recognition of `configmap-hash/<name>` and `secret-hash/<name>` annotation keys.

use crate::types::{DependencyKey, SourceKind};
use regex::Regex;
use std::sync::LazyLock;

static DEPENDENCY_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(configmap|secret)-hash/(.+)$").expect("hardcoded regex pattern is valid")
});

/// Parse an annotation key into the dependency it declares.
///
/// The name is everything after the first `/`, further slashes included.
/// Any other key yields `None`.
pub fn match_key(key: &str) -> Option<DependencyKey> {
    let captures = DEPENDENCY_KEY_REGEX.captures(key)?;
    let kind = SourceKind::from_token(captures.get(1)?.as_str())?;
    let name = captures.get(2)?.as_str();

    Some(DependencyKey::new(kind, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_configmap() {
        assert_eq!(
            match_key("configmap-hash/my-config"),
            Some(DependencyKey::new(SourceKind::ConfigData, "my-config"))
        );
    }

    #[test]
    fn test_valid_secret() {
        assert_eq!(
            match_key("secret-hash/my-secret"),
            Some(DependencyKey::new(SourceKind::SecretData, "my-secret"))
        );
    }

    #[test]
    fn test_name_keeps_embedded_slashes() {
        assert_eq!(
            match_key("secret-hash/team/db/creds"),
            Some(DependencyKey::new(SourceKind::SecretData, "team/db/creds"))
        );
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(match_key("app/something"), None);
    }

    #[test]
    fn test_completely_wrong_key() {
        assert_eq!(match_key("random-key"), None);
    }

    #[test]
    fn test_empty_name_does_not_match() {
        assert_eq!(match_key("configmap-hash/"), None);
    }

    #[test]
    fn test_unknown_kind_and_prefixed_keys_do_not_match() {
        assert_eq!(match_key("deployment-hash/web"), None);
        assert_eq!(match_key("x-configmap-hash/web"), None);
        assert_eq!(match_key("ConfigMap-hash/web"), None);
        assert_eq!(match_key(""), None);
    }
}
