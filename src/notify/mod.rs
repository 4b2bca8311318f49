// src/notify/mod.rs

//! Outgoing notifications.
//!
//! - [`Notifier`] abstracts the messaging channel.
//! - [`telegram::TelegramNotifier`] talks to the Telegram Bot API.
//! - [`LogNotifier`] is used when no credentials are configured.
//! - [`dispatch::NotifyDispatcher`] wraps a notifier with the delivery
//!   failure policy (log, report once, never recurse).

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::capture::CapturedImage;
use crate::errors::Result;

pub mod dispatch;
pub mod telegram;

pub use dispatch::NotifyDispatcher;
pub use telegram::TelegramNotifier;

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A messaging channel bound to one recipient.
///
/// Delivery failures are reported as `PagewatchError::Notify`.
pub trait Notifier: Send + Sync {
    fn send_text<'a>(&'a self, text: &'a str) -> NotifyFuture<'a>;

    fn send_photo<'a>(&'a self, image: &'a CapturedImage, caption: &'a str) -> NotifyFuture<'a>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_text<'a>(&'a self, text: &'a str) -> NotifyFuture<'a> {
        Box::pin(async move {
            info!(text = %text, "notification (not sent, no credentials)");
            Ok(())
        })
    }

    fn send_photo<'a>(&'a self, image: &'a CapturedImage, caption: &'a str) -> NotifyFuture<'a> {
        Box::pin(async move {
            info!(
                caption = %caption,
                file = %image.file_name,
                bytes = image.bytes.len(),
                "photo notification (not sent, no credentials)"
            );
            Ok(())
        })
    }
}
