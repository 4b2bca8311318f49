// src/watcher/mod.rs

//! Change detection for a single resource.
//!
//! One `check` composes: load prior snapshot → fetch → classify → emit
//! events → persist the new snapshot.
//!
//! The pure comparison lives in [`classify`]; the I/O shell that talks to
//! the store, the fetcher and the event sink is in [`check`]. The watcher has
//! no notion of time and keeps no state between checks other than what the
//! [`SnapshotStore`](crate::store::SnapshotStore) persists.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use crate::config::ResourceConfig;
use crate::errors::PagewatchError;
use crate::snapshot::Snapshot;
use crate::types::SnapshotKind;

pub mod check;
pub mod classify;

pub use check::Watcher;
pub use classify::{classify, is_monitored};

/// Outcome of comparing a fresh snapshot against the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Nothing was stored for this resource yet.
    FirstObservation,
    /// No change of interest. For label resources this means no monitored
    /// label differs; unmonitored `Added`/`Removed` may precede it.
    Unchanged,
    /// A label appeared.
    Added(String),
    /// A label disappeared.
    Removed(String),
    /// The page digest differs.
    Changed,
}

/// The identity and comparison rules of one monitored resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub id: String,
    pub kind: SnapshotKind,
    /// Labels of interest for label resources. Empty means all labels.
    pub monitored: BTreeSet<String>,
}

impl ResourceSpec {
    pub fn new(id: impl Into<String>, kind: SnapshotKind) -> Self {
        Self {
            id: id.into(),
            kind,
            monitored: BTreeSet::new(),
        }
    }

    pub fn with_monitored<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monitored.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn from_config(id: &str, resource: &ResourceConfig) -> Self {
        Self::new(id, resource.kind).with_monitored(resource.monitored.iter().cloned())
    }

    pub fn is_monitored(&self, label: &str) -> bool {
        is_monitored(&self.monitored, label)
    }
}

/// How a `check` ended. The watcher never returns an error; failures have
/// already been reported to the sink when one of the failure variants is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Events were emitted and the new snapshot was stored.
    Completed(Vec<ChangeEvent>),
    /// The fetch failed; the stored snapshot was left untouched.
    FetchFailed,
    /// Events were emitted but storing the new snapshot failed.
    PersistFailed,
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Completed(_))
    }
}

pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Receiver of watcher output.
///
/// Implementations deal with their own delivery problems (log and move on);
/// nothing flows back into the watcher.
pub trait EventSink: Send {
    fn on_event<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        event: &'a ChangeEvent,
    ) -> SinkFuture<'a>;

    fn on_failure<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        error: &'a PagewatchError,
    ) -> SinkFuture<'a>;

    /// The freshly fetched snapshot, after its events were emitted.
    fn on_snapshot<'a>(
        &'a mut self,
        _resource: &'a ResourceSpec,
        _snapshot: &'a Snapshot,
    ) -> SinkFuture<'a> {
        Box::pin(async {})
    }
}
