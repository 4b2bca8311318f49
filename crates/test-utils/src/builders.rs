#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use pagewatch::config::{
    CaptureSection, CompanionConfig, ConfigFile, ConfigSection, NotifySection, RawConfigFile,
    ResourceConfig, ScheduleSection,
};
use pagewatch::types::{CacheBackend, SnapshotKind};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                notify: NotifySection::default(),
                capture: CaptureSection::default(),
                schedule: None,
                resource: BTreeMap::new(),
            },
        }
    }

    pub fn with_resource(mut self, name: &str, resource: ResourceConfig) -> Self {
        self.config.resource.insert(name.to_string(), resource);
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.config.cache_dir = dir.into();
        self
    }

    pub fn with_cache_backend(mut self, backend: CacheBackend) -> Self {
        self.config.config.cache_backend = backend;
        self
    }

    pub fn with_credentials(mut self, token: &str, chat_id: &str) -> Self {
        self.config.notify.token = Some(token.to_string());
        self.config.notify.chat_id = Some(chat_id.to_string());
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleSection) -> Self {
        self.config.schedule = Some(schedule);
        self
    }

    /// The raw, unvalidated config (for validation tests).
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ResourceConfig`.
pub struct ResourceConfigBuilder {
    resource: ResourceConfig,
}

impl ResourceConfigBuilder {
    pub fn digest(url: &str) -> Self {
        Self::new(url, SnapshotKind::Digest)
    }

    pub fn labels(url: &str) -> Self {
        Self::new(url, SnapshotKind::Labels)
    }

    fn new(url: &str, kind: SnapshotKind) -> Self {
        Self {
            resource: ResourceConfig {
                url: url.to_string(),
                kind,
                selector: None,
                monitored: vec![],
                report_all: false,
                cache: None,
                capture: false,
                capture_css: None,
                companions: vec![],
                enabled: true,
            },
        }
    }

    pub fn selector(mut self, selector: &str) -> Self {
        self.resource.selector = Some(selector.to_string());
        self
    }

    pub fn monitored(mut self, label: &str) -> Self {
        self.resource.monitored.push(label.to_string());
        self
    }

    pub fn report_all(mut self, val: bool) -> Self {
        self.resource.report_all = val;
        self
    }

    pub fn cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource.cache = Some(path.into());
        self
    }

    pub fn capture(mut self, val: bool) -> Self {
        self.resource.capture = val;
        self
    }

    pub fn companion(mut self, url: &str) -> Self {
        self.resource.companions.push(CompanionConfig::Url(url.to_string()));
        self
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.resource.enabled = val;
        self
    }

    pub fn build(self) -> ResourceConfig {
        self.resource
    }
}
