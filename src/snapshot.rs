// src/snapshot.rs

//! Observed resource state and its on-disk form.

use std::collections::BTreeSet;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::types::SnapshotKind;

/// Hex blake3 digest of a page body.
pub fn compute_digest(body: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(body);
    hasher.finalize().to_hex().to_string()
}

/// State of a monitored resource at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Digest of the full page content.
    Digest(String),
    /// Text labels extracted from the page (e.g. `<option>`s of a select).
    Labels(BTreeSet<String>),
}

impl Snapshot {
    /// Snapshot of a page body for a digest resource.
    pub fn of_body(body: &str) -> Self {
        Snapshot::Digest(compute_digest(body.as_bytes()))
    }

    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Snapshot::Labels(labels.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Digest(_) => SnapshotKind::Digest,
            Snapshot::Labels(_) => SnapshotKind::Labels,
        }
    }
}

/// Persisted form of a [`Snapshot`]: one JSON object with a single field.
///
/// ```json
/// {"hash": "af13..."}
/// {"labels": ["TEHERAN", "WIEN"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheRecord {
    Digest { hash: String },
    Labels { labels: Vec<String> },
}

impl From<&Snapshot> for CacheRecord {
    fn from(snapshot: &Snapshot) -> Self {
        match snapshot {
            Snapshot::Digest(hash) => CacheRecord::Digest { hash: hash.clone() },
            // BTreeSet iteration is sorted, so the file is stable across runs.
            Snapshot::Labels(labels) => CacheRecord::Labels {
                labels: labels.iter().cloned().collect(),
            },
        }
    }
}

impl From<CacheRecord> for Snapshot {
    fn from(record: CacheRecord) -> Self {
        match record {
            CacheRecord::Digest { hash } => Snapshot::Digest(hash),
            CacheRecord::Labels { labels } => Snapshot::Labels(labels.into_iter().collect()),
        }
    }
}
