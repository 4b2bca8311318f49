// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{CacheBackend, SnapshotKind};

/// Default CSS selector for label resources: the options of the office
/// drop-down on the appointment portal.
pub const DEFAULT_LABEL_SELECTOR: &str = "select#Office option";

/// Default notification endpoint (Telegram Bot API).
pub const DEFAULT_NOTIFY_ENDPOINT: &str = "https://api.telegram.org";

/// Default URL-to-image endpoint (apiflash-compatible).
pub const DEFAULT_CAPTURE_ENDPOINT: &str = "https://api.apiflash.com/v1/urltoimage";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// cache_dir = "/tmp/pagewatch"
/// timeout_secs = 20
///
/// [notify]
/// token = "123:abc"
/// chat_id = "42"
///
/// [resource.embassy]
/// url = "https://www.bmeia.gv.at/oeb-teheran"
/// kind = "digest"
/// ```
///
/// Only `[resource.*]` is required; every other section has defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub notify: NotifySection,

    #[serde(default)]
    pub capture: CaptureSection,

    /// Absent means: never announce unchanged results, no start/stop messages.
    #[serde(default)]
    pub schedule: Option<ScheduleSection>,

    /// Keys are resource ids (also used as cache file stems).
    #[serde(default)]
    pub resource: BTreeMap<String, ResourceConfig>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holders of a `ConfigFile` can rely on its invariants.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub notify: NotifySection,
    pub capture: CaptureSection,
    pub schedule: Option<ScheduleSection>,
    pub resource: BTreeMap<String, ResourceConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            config: raw.config,
            notify: raw.notify,
            capture: raw.capture,
            schedule: raw.schedule,
            resource: raw.resource,
        }
    }

    /// Enabled resources in name order.
    pub fn enabled_resources(&self) -> impl Iterator<Item = (&String, &ResourceConfig)> {
        self.resource.iter().filter(|(_, r)| r.enabled)
    }
}

/// `[config]` section: global behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Directory holding one cache file per resource.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Upper bound for a single fetch; exceeding it is a fetch failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".pagewatch")
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache_backend: CacheBackend::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// `[notify]` section: messaging webhook credentials.
///
/// `token` and `chat_id` may also come from the environment, see
/// [`crate::config::apply_env_overrides`].
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    #[serde(default = "default_notify_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub chat_id: Option<String>,
}

fn default_notify_endpoint() -> String {
    DEFAULT_NOTIFY_ENDPOINT.to_string()
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            endpoint: default_notify_endpoint(),
            token: None,
            chat_id: None,
        }
    }
}

impl NotifySection {
    /// Both credentials present and non-blank.
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.token) && present(&self.chat_id)
    }
}

/// `[capture]` section: screenshot service.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSection {
    #[serde(default = "default_capture_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub access_key: Option<String>,
}

fn default_capture_endpoint() -> String {
    DEFAULT_CAPTURE_ENDPOINT.to_string()
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            endpoint: default_capture_endpoint(),
            access_key: None,
        }
    }
}

/// `[schedule]` section. All times are local `HH:MM` in `utc_offset`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScheduleSection {
    /// e.g. `"+03:30"`. Defaults to UTC.
    #[serde(default)]
    pub utc_offset: Option<String>,

    /// Times at which an unchanged result is still announced.
    #[serde(default)]
    pub report_times: Vec<String>,

    /// Times at which screenshots accompany the unchanged announcement.
    #[serde(default)]
    pub snapshot_times: Vec<String>,

    /// Time at which a "started monitoring" message is sent.
    #[serde(default)]
    pub start_time: Option<String>,

    /// Time at which a "stopped monitoring" message is sent.
    #[serde(default)]
    pub stop_time: Option<String>,
}

/// `[resource.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    pub url: String,

    #[serde(default)]
    pub kind: SnapshotKind,

    /// CSS selector for label resources. Defaults to
    /// [`DEFAULT_LABEL_SELECTOR`] when `kind = "labels"`.
    #[serde(default)]
    pub selector: Option<String>,

    /// Labels of interest. Empty means every label is of interest.
    #[serde(default)]
    pub monitored: Vec<String>,

    /// Send the full extracted label list after every successful check.
    #[serde(default)]
    pub report_all: bool,

    /// Explicit cache file, overriding `<cache_dir>/<name>.json`.
    #[serde(default)]
    pub cache: Option<PathBuf>,

    /// Attach a screenshot when the page changed.
    #[serde(default)]
    pub capture: bool,

    /// Extra CSS injected by the screenshot service.
    #[serde(default)]
    pub capture_css: Option<String>,

    /// Other pages captured alongside this one.
    #[serde(default)]
    pub companions: Vec<CompanionConfig>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ResourceConfig {
    /// Selector actually used for extraction.
    pub fn effective_selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(DEFAULT_LABEL_SELECTOR)
    }
}

/// A page captured next to its resource, e.g. the visa-service site shown
/// together with the embassy page.
///
/// Accepts both `companions = ["https://..."]` and
/// `companions = [{ url = "https://...", css = "..." }]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompanionConfig {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        css: Option<String>,
    },
}

impl CompanionConfig {
    pub fn url(&self) -> &str {
        match self {
            CompanionConfig::Url(url) => url,
            CompanionConfig::Detailed { url, .. } => url,
        }
    }

    pub fn css(&self) -> Option<&str> {
        match self {
            CompanionConfig::Url(_) => None,
            CompanionConfig::Detailed { css, .. } => css.as_deref(),
        }
    }
}
