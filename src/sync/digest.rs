// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Content fingerprints for ConfigMap and Secret data.
//!
//! Entries are sorted by key and concatenated as `key:value` with no
//! separator between entries before hashing with SHA-256. Keys and values
//! are not escaped, so two distinct mappings whose concatenations coincide
//! (`{"a": "b:c"}` and `{"a:b": "c"}`) share a digest. This is a known
//! limitation of the annotation format, not a uniqueness guarantee.

use crate::constants::NO_DATA_DIGEST;
use sha2::{Digest as _, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Lowercase hex SHA-256 of a source's data, or the "no data" sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(String);

impl Digest {
    /// The digest of a source with no (or empty) data
    pub fn no_data() -> Self {
        Self(NO_DATA_DIGEST.to_string())
    }

    /// Compute the digest of a data mapping.
    pub fn of(data: Option<&BTreeMap<String, String>>) -> Self {
        match data {
            Some(data) if !data.is_empty() => Self::of_entries(data.iter()),
            _ => Self::no_data(),
        }
    }

    /// Compute the digest of entries in any order.
    pub fn of_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut entries: Vec<_> = entries.into_iter().collect();
        if entries.is_empty() {
            return Self::no_data();
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut hasher = Sha256::new();
        for (key, value) in entries {
            hasher.update(key.as_bytes());
            hasher.update(b":");
            hasher.update(value.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn is_no_data(&self) -> bool {
        self.0 == NO_DATA_DIGEST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Digest {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}
