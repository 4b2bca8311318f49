// src/capture/screenshot_api.rs

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use crate::capture::{CaptureFuture, CaptureRequest, CapturedImage, ImageCapture};
use crate::errors::{PagewatchError, Result};

/// Full-page renders take a while; allow much longer than a plain fetch.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(90);

/// Client for an apiflash-compatible URL-to-image service.
#[derive(Clone)]
pub struct ScreenshotApiCapture {
    client: Client,
    endpoint: String,
    access_key: String,
}

impl fmt::Debug for ScreenshotApiCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenshotApiCapture")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ScreenshotApiCapture {
    pub fn new(endpoint: &str, access_key: &str) -> Result<Self> {
        if access_key.trim().is_empty() {
            return Err(PagewatchError::ConfigError(
                "screenshot capture needs an access_key".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(CAPTURE_TIMEOUT)
            .build()
            .map_err(|e| PagewatchError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            access_key: access_key.trim().to_string(),
        })
    }

    /// Query parameters for one render.
    pub fn query_for(&self, request: &CaptureRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("access_key", self.access_key.clone()),
            ("url", request.url.clone()),
            ("format", "jpeg".to_string()),
            ("fresh", "true".to_string()),
            ("response_type", "image".to_string()),
            ("no_cookie_banners", "true".to_string()),
            ("full_page", "true".to_string()),
            ("scroll_page", "true".to_string()),
            ("wait_until", "network_idle".to_string()),
        ];
        if let Some(css) = &request.css {
            params.push(("css", css.clone()));
        }
        params
    }
}

/// File name for the attachment, derived from the page host.
fn file_name_for(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "page".to_string());
    format!("{}.jpg", host.replace('.', "_"))
}

impl ImageCapture for ScreenshotApiCapture {
    fn capture<'a>(&'a self, request: &'a CaptureRequest) -> CaptureFuture<'a> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.endpoint)
                .query(&self.query_for(request))
                .send()
                .await
                // The query string holds the access key.
                .map_err(|e| {
                    PagewatchError::Fetch(format!("screenshot request failed: {}", e.without_url()))
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(PagewatchError::Fetch(format!(
                    "screenshot of {} failed ({status})",
                    request.url
                )));
            }

            let bytes = resp.bytes().await.map_err(|e| {
                PagewatchError::Fetch(format!("reading screenshot failed: {}", e.without_url()))
            })?;
            debug!(url = %request.url, bytes = bytes.len(), "captured screenshot");
            Ok(CapturedImage::jpeg(bytes.to_vec(), file_name_for(&request.url)))
        })
    }
}
