// src/capture/mod.rs

//! Screenshots of monitored pages, attached to change notifications.
//!
//! Capture is decoupled from comparison: the reporter asks for images only
//! after the watcher has classified a change (or at a scheduled snapshot
//! time), and a capture failure never affects the check itself.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub mod screenshot_api;

pub use screenshot_api::ScreenshotApiCapture;

/// An image ready to be attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

impl CapturedImage {
    pub fn jpeg(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime: "image/jpeg",
        }
    }
}

/// What to capture: a page url and optional CSS injected before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub url: String,
    pub css: Option<String>,
}

pub type CaptureFuture<'a> = Pin<Box<dyn Future<Output = Result<CapturedImage>> + Send + 'a>>;

pub trait ImageCapture: Send + Sync {
    fn capture<'a>(&'a self, request: &'a CaptureRequest) -> CaptureFuture<'a>;
}
