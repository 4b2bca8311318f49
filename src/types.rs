use serde::{Deserialize, Serialize};

/// How a resource's state is captured and compared.
///
/// - `Digest`: blake3 digest of the full page body; any byte difference is a
///   change.
/// - `Labels`: the set of text labels matched by a CSS selector (e.g. the
///   options of a `<select>`); additions and removals are reported per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Digest,
    Labels,
}

impl Default for SnapshotKind {
    fn default() -> Self {
        SnapshotKind::Digest
    }
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotKind::Digest => f.write_str("digest"),
            SnapshotKind::Labels => f.write_str("labels"),
        }
    }
}

/// Where snapshots are persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One JSON file per resource under `cache_dir`.
    File,
    /// In memory only (lost when the process exits).
    Memory,
}

impl Default for CacheBackend {
    fn default() -> Self {
        CacheBackend::File
    }
}
