// src/report.rs

//! Turns watcher events into user-facing messages.
//!
//! The [`Reporter`] is the [`EventSink`] used by the binary. It formats
//! events, consults the [`SchedulePolicy`] for unchanged results and
//! attaches screenshots when a page changed. Monitored labels get the
//! prominent message; other label changes a short informational one.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use tracing::{debug, warn};

use crate::capture::{CaptureRequest, ImageCapture};
use crate::config::ResourceConfig;
use crate::errors::PagewatchError;
use crate::notify::NotifyDispatcher;
use crate::schedule::SchedulePolicy;
use crate::snapshot::Snapshot;
use crate::watcher::{ChangeEvent, EventSink, ResourceSpec, SinkFuture};

/// What the reporter knows about a resource beyond its [`ResourceSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub url: String,
    /// Send the whole label list after each check.
    pub report_all: bool,
    /// Screenshots to send: the page itself first, then its companions.
    /// Empty when capture is disabled for the resource.
    pub shots: Vec<CaptureRequest>,
}

impl PageInfo {
    pub fn from_config(resource: &ResourceConfig) -> Self {
        let shots = if resource.capture {
            let mut shots = vec![CaptureRequest {
                url: resource.url.clone(),
                css: resource.capture_css.clone(),
            }];
            shots.extend(resource.companions.iter().map(|c| CaptureRequest {
                url: c.url().to_string(),
                css: c.css().map(str::to_string),
            }));
            shots
        } else {
            Vec::new()
        };
        Self {
            url: resource.url.clone(),
            report_all: resource.report_all,
            shots,
        }
    }
}

pub struct Reporter {
    dispatcher: NotifyDispatcher,
    capture: Option<Box<dyn ImageCapture>>,
    schedule: SchedulePolicy,
    at: NaiveTime,
    pages: BTreeMap<String, PageInfo>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("at", &self.at)
            .field("pages", &self.pages)
            .field("capture", &self.capture.is_some())
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// `at` is the local time the schedule is evaluated against for this run.
    pub fn new(dispatcher: NotifyDispatcher, schedule: SchedulePolicy, at: NaiveTime) -> Self {
        Self {
            dispatcher,
            capture: None,
            schedule,
            at,
            pages: BTreeMap::new(),
        }
    }

    pub fn with_capture(mut self, capture: Box<dyn ImageCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn with_page(mut self, id: impl Into<String>, page: PageInfo) -> Self {
        self.pages.insert(id.into(), page);
        self
    }

    /// Send the "started monitoring" message if this run falls on the
    /// configured start time.
    pub async fn announce_start(&self) -> bool {
        if !self.schedule.is_start(self.at) {
            return false;
        }
        let text = format!("🟢 Started monitoring:\n{}", self.url_list());
        self.dispatcher.text(&text).await
    }

    /// Send the "stopped monitoring" message if this run falls on the
    /// configured stop time.
    pub async fn announce_stop(&self) -> bool {
        if !self.schedule.is_stop(self.at) {
            return false;
        }
        let text = format!("🔴 Stopped monitoring:\n{}", self.url_list());
        self.dispatcher.text(&text).await
    }

    fn url_list(&self) -> String {
        self.pages
            .values()
            .map(|p| p.url.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn url_of<'a>(&'a self, resource: &'a ResourceSpec) -> &'a str {
        self.pages
            .get(&resource.id)
            .map(|p| p.url.as_str())
            .unwrap_or(resource.id.as_str())
    }

    async fn send_screenshots(&self, resource: &ResourceSpec, headline: &str) {
        let Some(capture) = self.capture.as_ref() else {
            return;
        };
        let Some(page) = self.pages.get(&resource.id) else {
            return;
        };

        for (idx, shot) in page.shots.iter().enumerate() {
            let caption = if idx == 0 {
                headline.to_string()
            } else {
                shot.url.clone()
            };
            match capture.capture(shot).await {
                Ok(image) => {
                    self.dispatcher.photo(&image, &caption).await;
                }
                Err(err) => {
                    warn!(resource = %resource.id, url = %shot.url, error = %err, "screenshot failed; skipping");
                }
            }
        }
    }

    async fn report_labels(&self, resource: &ResourceSpec, snapshot: &Snapshot) {
        let Snapshot::Labels(labels) = snapshot else {
            return;
        };
        if !self.pages.get(&resource.id).is_some_and(|p| p.report_all) {
            return;
        }
        let list = labels.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
        self.dispatcher
            .text(&format!("📋 {} options:\n\n{list}", resource.id))
            .await;
    }

    async fn report_event(&self, resource: &ResourceSpec, event: &ChangeEvent) {
        let url = self.url_of(resource);
        match event {
            ChangeEvent::FirstObservation => {
                self.dispatcher
                    .text(&format!("🟢 Started monitoring\n{url}"))
                    .await;
            }
            ChangeEvent::Changed => {
                self.dispatcher
                    .text(&format!("⚠️ Website changed!\n{url}"))
                    .await;
                self.send_screenshots(resource, &format!("⚠️ {} changed", resource.id))
                    .await;
            }
            ChangeEvent::Added(label) if resource.is_monitored(label) => {
                self.dispatcher
                    .text(&format!("🟢 \"{label}\" was added to {}\n{url}", resource.id))
                    .await;
            }
            ChangeEvent::Removed(label) if resource.is_monitored(label) => {
                self.dispatcher
                    .text(&format!("🔴 \"{label}\" was removed from {}\n{url}", resource.id))
                    .await;
            }
            ChangeEvent::Added(label) => {
                self.dispatcher
                    .text(&format!("ℹ️ \"{label}\" was added to {}", resource.id))
                    .await;
            }
            ChangeEvent::Removed(label) => {
                self.dispatcher
                    .text(&format!("ℹ️ \"{label}\" was removed from {}", resource.id))
                    .await;
            }
            ChangeEvent::Unchanged => {
                if !self.schedule.reports_unchanged_at(self.at) {
                    debug!(resource = %resource.id, at = %self.at, "unchanged; not a report time");
                    return;
                }
                self.dispatcher
                    .text(&format!("✅ No change\n{url}"))
                    .await;
                if self.schedule.snapshots_at(self.at) {
                    self.send_screenshots(resource, &resource.id).await;
                }
            }
        }
    }
}

impl EventSink for Reporter {
    fn on_event<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        event: &'a ChangeEvent,
    ) -> SinkFuture<'a> {
        Box::pin(async move { self.report_event(resource, event).await })
    }

    fn on_failure<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        error: &'a PagewatchError,
    ) -> SinkFuture<'a> {
        Box::pin(async move {
            let text = format!("❌ Error checking {}: {error}", resource.id);
            self.dispatcher.text(&text).await;
        })
    }

    fn on_snapshot<'a>(
        &'a mut self,
        resource: &'a ResourceSpec,
        snapshot: &'a Snapshot,
    ) -> SinkFuture<'a> {
        Box::pin(async move { self.report_labels(resource, snapshot).await })
    }
}
