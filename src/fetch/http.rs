// src/fetch/http.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::{ConfigSection, ResourceConfig};
use crate::errors::{PagewatchError, Result};
use crate::fetch::extract::extract_labels;
use crate::fetch::Fetcher;
use crate::snapshot::Snapshot;
use crate::types::SnapshotKind;

/// Build the shared HTTP client for page fetches.
///
/// `timeout_secs` bounds the whole request; running into it is reported as
/// a fetch failure like any other.
pub fn build_client(cfg: &ConfigSection) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .user_agent(cfg.user_agent.clone())
        .build()
        .map_err(|e| PagewatchError::Fetch(format!("failed to build HTTP client: {e}")))
}

/// What to derive from a fetched body.
#[derive(Debug, Clone)]
enum Extraction {
    Digest,
    Labels { selector: String },
}

/// Fetches one configured resource over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
    extraction: Extraction,
}

impl HttpFetcher {
    pub fn new(client: Client, resource: &ResourceConfig) -> Self {
        let extraction = match resource.kind {
            SnapshotKind::Digest => Extraction::Digest,
            SnapshotKind::Labels => Extraction::Labels {
                selector: resource.effective_selector().to_string(),
            },
        };
        Self {
            client,
            url: resource.url.clone(),
            extraction,
        }
    }

    async fn fetch_body(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                PagewatchError::Fetch(format!("timed out fetching {}", self.url))
            } else {
                PagewatchError::Fetch(format!("error fetching {}: {e}", self.url))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PagewatchError::Fetch(format!(
                "{} returned {status}",
                self.url
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PagewatchError::Fetch(format!("error reading {}: {e}", self.url)))?;
        debug!(url = %self.url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot>> + Send + '_>> {
        Box::pin(async move {
            let body = self.fetch_body().await?;
            match &self.extraction {
                Extraction::Digest => Ok(Snapshot::of_body(&body)),
                Extraction::Labels { selector } => {
                    let labels = extract_labels(&body, selector)?;
                    Ok(Snapshot::labels(labels))
                }
            }
        })
    }
}
