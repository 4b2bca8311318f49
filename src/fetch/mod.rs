// src/fetch/mod.rs

//! Turning a remote page into a [`Snapshot`].
//!
//! - [`Fetcher`] is the seam the watcher consumes; tests plug in scripted
//!   fetchers.
//! - [`http::HttpFetcher`] is the production implementation (reqwest).
//! - [`extract`] pulls text labels out of HTML with `scraper`.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::snapshot::Snapshot;

pub mod extract;
pub mod http;

pub use extract::extract_labels;
pub use http::{build_client, HttpFetcher};

/// Produces a fresh snapshot of one resource.
///
/// Failures are reported as `PagewatchError::Fetch`.
pub trait Fetcher: Send + Sync {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<Snapshot>> + Send + '_>>;
}
