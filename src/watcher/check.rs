// src/watcher/check.rs

use tracing::{debug, error, info, warn};

use crate::errors::PagewatchError;
use crate::fetch::Fetcher;
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;
use crate::watcher::classify::classify;
use crate::watcher::{CheckOutcome, EventSink, ResourceSpec};

/// Runs checks against a snapshot store.
pub struct Watcher {
    store: Box<dyn SnapshotStore>,
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher").finish_non_exhaustive()
    }
}

impl Watcher {
    pub fn new(store: Box<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    /// Check one resource.
    ///
    /// 1. Load the prior snapshot. Absent, unreadable or of the wrong kind
    ///    all mean "first run".
    /// 2. Fetch. On failure report once through `sink.on_failure` and return
    ///    without touching the store.
    /// 3. Classify, hand every event to `sink.on_event`, then the snapshot to
    ///    `sink.on_snapshot`.
    /// 4. Replace the stored snapshot.
    pub async fn check(
        &mut self,
        resource: &ResourceSpec,
        fetcher: &dyn Fetcher,
        sink: &mut dyn EventSink,
    ) -> CheckOutcome {
        let prior = self.load_prior(resource);

        let snapshot = match fetcher.fetch().await {
            Ok(snapshot) if snapshot.kind() == resource.kind => snapshot,
            Ok(snapshot) => {
                let err = PagewatchError::Fetch(format!(
                    "fetcher produced a {} snapshot for {} resource",
                    snapshot.kind(),
                    resource.kind
                ));
                return self.fetch_failed(resource, err, sink).await;
            }
            Err(err) => return self.fetch_failed(resource, err, sink).await,
        };

        let events = classify(prior.as_ref(), &snapshot, &resource.monitored);
        for event in events.iter() {
            info!(resource = %resource.id, event = ?event, "change classified");
            sink.on_event(resource, event).await;
        }
        sink.on_snapshot(resource, &snapshot).await;

        if let Err(err) = self.store.save(&resource.id, &snapshot) {
            error!(resource = %resource.id, error = %err, "failed to store snapshot");
            sink.on_failure(resource, &err).await;
            return CheckOutcome::PersistFailed;
        }

        CheckOutcome::Completed(events)
    }

    fn load_prior(&self, resource: &ResourceSpec) -> Option<Snapshot> {
        match self.store.load(&resource.id) {
            Ok(Some(snapshot)) if snapshot.kind() != resource.kind => {
                warn!(
                    resource = %resource.id,
                    stored = %snapshot.kind(),
                    expected = %resource.kind,
                    "stored snapshot has a different kind; treating as first observation"
                );
                None
            }
            Ok(prior) => {
                debug!(resource = %resource.id, has_prior = prior.is_some(), "loaded prior snapshot");
                prior
            }
            Err(err) => {
                warn!(
                    resource = %resource.id,
                    error = %err,
                    "could not read stored snapshot; treating as first observation"
                );
                None
            }
        }
    }

    async fn fetch_failed(
        &self,
        resource: &ResourceSpec,
        err: PagewatchError,
        sink: &mut dyn EventSink,
    ) -> CheckOutcome {
        warn!(resource = %resource.id, error = %err, "fetch failed; stored snapshot left as is");
        sink.on_failure(resource, &err).await;
        CheckOutcome::FetchFailed
    }
}
