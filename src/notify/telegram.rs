// src/notify/telegram.rs

use std::fmt;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::capture::CapturedImage;
use crate::errors::{PagewatchError, Result};
use crate::notify::{Notifier, NotifyFuture};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API client for one chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    token: String,
    chat_id: String,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("endpoint", &self.endpoint)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(endpoint: &str, token: &str, chat_id: &str) -> Result<Self> {
        if token.trim().is_empty() || chat_id.trim().is_empty() {
            return Err(PagewatchError::ConfigError(
                "telegram notifier needs a token and a chat_id".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| PagewatchError::Notify(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.endpoint, self.token, method)
    }

    async fn check_response(method: &str, resp: Response) -> Result<()> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());

        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(PagewatchError::Notify(format!(
                "{method} failed ({status}): {}",
                api.description.unwrap_or(body)
            ))),
            None if status.is_success() => Ok(()),
            None => Err(PagewatchError::Notify(format!("{method} failed ({status}): {body}"))),
        }
    }
}

/// reqwest errors carry the request URL, which embeds the bot token.
fn transport_error(method: &str, err: reqwest::Error) -> PagewatchError {
    PagewatchError::Notify(format!("{method} request failed: {}", err.without_url()))
}

impl Notifier for TelegramNotifier {
    fn send_text<'a>(&'a self, text: &'a str) -> NotifyFuture<'a> {
        Box::pin(async move {
            let resp = self
                .client
                .post(self.method_url("sendMessage"))
                .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
                .send()
                .await
                .map_err(|e| transport_error("sendMessage", e))?;
            Self::check_response("sendMessage", resp).await
        })
    }

    fn send_photo<'a>(&'a self, image: &'a CapturedImage, caption: &'a str) -> NotifyFuture<'a> {
        Box::pin(async move {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(image.mime)
                .map_err(|e| transport_error("sendPhoto", e))?;
            let form = Form::new()
                .text("chat_id", self.chat_id.clone())
                .text("caption", caption.to_string())
                .part("photo", part);

            let resp = self
                .client
                .post(self.method_url("sendPhoto"))
                .multipart(form)
                .send()
                .await
                .map_err(|e| transport_error("sendPhoto", e))?;
            Self::check_response("sendPhoto", resp).await
        })
    }
}
