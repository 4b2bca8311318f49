// src/store.rs

//! Persistence of the last-seen snapshot per resource.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::errors::{PagewatchError, Result};
use crate::fs::FileSystem;
use crate::snapshot::{CacheRecord, Snapshot};

/// Abstract storage for resource snapshots.
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing was stored yet for `resource`.
    fn load(&self, resource: &str) -> Result<Option<Snapshot>>;

    /// Fully replace the stored snapshot for `resource`.
    fn save(&mut self, resource: &str, snapshot: &Snapshot) -> Result<()>;
}

/// Stores each resource's snapshot as JSON in its own file.
///
/// The default location is `<dir>/<resource>.json`; individual resources may
/// be pointed elsewhere with [`FileSnapshotStore::with_path`].
#[derive(Debug)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    overrides: HashMap<String, PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            overrides: HashMap::new(),
            fs,
        }
    }

    /// Build a store honouring `[config].cache_dir` and per-resource `cache`
    /// overrides.
    pub fn from_config(cfg: &ConfigFile, fs: Arc<dyn FileSystem>) -> Self {
        let mut store = Self::new(cfg.config.cache_dir.clone(), fs);
        for (name, resource) in cfg.resource.iter() {
            if let Some(path) = &resource.cache {
                store = store.with_path(name, path.clone());
            }
        }
        store
    }

    pub fn with_path(mut self, resource: &str, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(resource.to_string(), path.into());
        self
    }

    pub fn path_for(&self, resource: &str) -> PathBuf {
        match self.overrides.get(resource) {
            Some(path) => path.clone(),
            None => self.dir.join(format!("{resource}.json")),
        }
    }

    fn read_record(&self, path: &Path) -> Result<CacheRecord> {
        let contents = self
            .fs
            .read_to_string(path)
            .map_err(|e| PagewatchError::Persist(format!("{e:#}")))?;
        serde_json::from_str(&contents).map_err(|e| {
            PagewatchError::Persist(format!("malformed cache record at {:?}: {e}", path))
        })
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, resource: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(resource);
        if !self.fs.exists(&path) {
            debug!(resource = %resource, ?path, "no cache file yet");
            return Ok(None);
        }
        let record = self.read_record(&path)?;
        Ok(Some(Snapshot::from(record)))
    }

    fn save(&mut self, resource: &str, snapshot: &Snapshot) -> Result<()> {
        let path = self.path_for(resource);
        let record = CacheRecord::from(snapshot);
        let bytes = serde_json::to_vec(&record)?;
        self.fs
            .write_atomic(&path, &bytes)
            .map_err(|e| PagewatchError::Persist(format!("{e:#}")))?;
        info!(resource = %resource, ?path, "stored snapshot (file)");
        Ok(())
    }
}

/// Stores snapshots in memory only.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    map: HashMap<String, Snapshot>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, resource: &str) -> Result<Option<Snapshot>> {
        Ok(self.map.get(resource).cloned())
    }

    fn save(&mut self, resource: &str, snapshot: &Snapshot) -> Result<()> {
        self.map.insert(resource.to_string(), snapshot.clone());
        info!(resource = %resource, "stored snapshot (memory)");
        Ok(())
    }
}
