#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pagewatch::capture::{CaptureFuture, CaptureRequest, CapturedImage, ImageCapture};
use pagewatch::errors::{PagewatchError, Result};
use pagewatch::fetch::Fetcher;
use pagewatch::notify::{Notifier, NotifyFuture};
use pagewatch::snapshot::Snapshot;
use pagewatch::watcher::{ChangeEvent, EventSink, ResourceSpec, SinkFuture};

/// A fetcher that replays a fixed script of results, one per call.
///
/// Once the script is exhausted every call fails.
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<std::result::Result<Snapshot, String>>>,
    calls: Mutex<usize>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, snapshot: Snapshot) -> Self {
        self.script.lock().unwrap().push_back(Ok(snapshot));
        self
    }

    pub fn then_err(self, message: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot>> + Send + '_>> {
        let next = {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().pop_front()
        };
        Box::pin(async move {
            match next {
                Some(Ok(snapshot)) => Ok(snapshot),
                Some(Err(message)) => Err(PagewatchError::Fetch(message)),
                None => Err(PagewatchError::Fetch("fetch script exhausted".to_string())),
            }
        })
    }
}

/// Records everything the watcher emits.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<(String, ChangeEvent)>,
    pub failures: Vec<(String, String)>,
    pub snapshots: Vec<(String, Snapshot)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for one resource, in emission order.
    pub fn events_for(&self, resource: &str) -> Vec<ChangeEvent> {
        self.events
            .iter()
            .filter(|(id, _)| id == resource)
            .map(|(_, ev)| ev.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.failures.clear();
        self.snapshots.clear();
    }
}

impl EventSink for RecordingSink {
    fn on_event<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        event: &'a ChangeEvent,
    ) -> SinkFuture<'a> {
        self.events.push((resource.id.clone(), event.clone()));
        Box::pin(async {})
    }

    fn on_failure<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        error: &'a PagewatchError,
    ) -> SinkFuture<'a> {
        self.failures.push((resource.id.clone(), error.to_string()));
        Box::pin(async {})
    }

    fn on_snapshot<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        snapshot: &'a Snapshot,
    ) -> SinkFuture<'a> {
        self.snapshots.push((resource.id.clone(), snapshot.clone()));
        Box::pin(async {})
    }
}

/// One delivery attempt seen by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Photo { caption: String, file_name: String },
}

impl Sent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Sent::Text(t) => Some(t),
            Sent::Photo { .. } => None,
        }
    }
}

/// A notifier that records every attempt and fails the first `n` of them.
///
/// Clones share state, so a test can keep a handle after boxing one clone
/// into a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    attempts: Arc<Mutex<Vec<Sent>>>,
    failures_left: Arc<Mutex<usize>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(n: usize) -> Self {
        let notifier = Self::default();
        *notifier.failures_left.lock().unwrap() = n;
        notifier
    }

    pub fn always_failing() -> Self {
        Self::failing_first(usize::MAX)
    }

    pub fn attempts(&self) -> Vec<Sent> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.attempts()
            .iter()
            .filter_map(|s| s.text().map(str::to_string))
            .collect()
    }

    fn record(&self, sent: Sent) -> Result<()> {
        self.attempts.lock().unwrap().push(sent);
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left = left.saturating_sub(1);
            return Err(PagewatchError::Notify("simulated outage".to_string()));
        }
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn send_text<'a>(&'a self, text: &'a str) -> NotifyFuture<'a> {
        let result = self.record(Sent::Text(text.to_string()));
        Box::pin(async move { result })
    }

    fn send_photo<'a>(&'a self, image: &'a CapturedImage, caption: &'a str) -> NotifyFuture<'a> {
        let result = self.record(Sent::Photo {
            caption: caption.to_string(),
            file_name: image.file_name.clone(),
        });
        Box::pin(async move { result })
    }
}

/// Screenshot service stand-in: returns the url bytes as the "image".
#[derive(Debug, Clone, Default)]
pub struct FakeCapture {
    requests: Arc<Mutex<Vec<CaptureRequest>>>,
    fail: bool,
}

impl FakeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CaptureRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageCapture for FakeCapture {
    fn capture<'a>(&'a self, request: &'a CaptureRequest) -> CaptureFuture<'a> {
        self.requests.lock().unwrap().push(request.clone());
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(PagewatchError::Fetch("simulated capture failure".to_string()));
            }
            Ok(CapturedImage::jpeg(
                request.url.as_bytes().to_vec(),
                format!("{}.jpg", request.url.len()),
            ))
        })
    }
}
