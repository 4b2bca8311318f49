// src/notify/dispatch.rs

use tracing::{debug, error, warn};

use crate::capture::CapturedImage;
use crate::errors::PagewatchError;
use crate::notify::Notifier;

/// How many "delivery failed" follow-up messages one failed delivery may
/// cause. A failing follow-up is only logged.
pub const MAX_FAILURE_REPORT_DEPTH: usize = 1;

/// Delivers notifications and absorbs delivery failures.
pub struct NotifyDispatcher {
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for NotifyDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyDispatcher").finish_non_exhaustive()
    }
}

impl NotifyDispatcher {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Send a text message. Returns whether it was delivered.
    pub async fn text(&self, text: &str) -> bool {
        let result = self.notifier.send_text(text).await;
        self.settle(result).await
    }

    /// Send a photo with caption. Returns whether it was delivered.
    pub async fn photo(&self, image: &CapturedImage, caption: &str) -> bool {
        let result = self.notifier.send_photo(image, caption).await;
        self.settle(result).await
    }

    async fn settle(&self, first: Result<(), PagewatchError>) -> bool {
        let delivered = first.is_ok();
        let mut pending = first;
        let mut depth = 0;

        loop {
            match pending {
                Ok(()) => {
                    debug!(depth, "notification delivered");
                    return delivered;
                }
                Err(err) if depth < MAX_FAILURE_REPORT_DEPTH => {
                    warn!(error = %err, depth, "notification failed; reporting the failure");
                    depth += 1;
                    let report = format!("Notification delivery failed: {err}");
                    pending = self.notifier.send_text(&report).await;
                }
                Err(err) => {
                    error!(error = %err, depth, "failure report could not be delivered; giving up");
                    return delivered;
                }
            }
        }
    }
}
