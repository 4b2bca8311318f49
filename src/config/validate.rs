// src/config/validate.rs

use reqwest::Url;
use scraper::Selector;

use crate::config::model::{ConfigFile, RawConfigFile, ResourceConfig};
use crate::errors::{PagewatchError, Result};
use crate::schedule::SchedulePolicy;
use crate::types::SnapshotKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PagewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_resources(cfg)?;
    validate_global_config(cfg)?;
    for (name, resource) in cfg.resource.iter() {
        validate_resource(name, resource)?;
    }
    // Schedule strings are parsed once here so that a typo fails at startup
    // rather than silently never matching.
    SchedulePolicy::from_config(cfg.schedule.as_ref())?;
    Ok(())
}

fn ensure_has_resources(cfg: &RawConfigFile) -> Result<()> {
    if cfg.resource.is_empty() {
        return Err(PagewatchError::ConfigError(
            "config must contain at least one [resource.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.timeout_secs == 0 {
        return Err(PagewatchError::ConfigError(
            "[config].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    parse_http_url("[notify].endpoint", &cfg.notify.endpoint)?;
    parse_http_url("[capture].endpoint", &cfg.capture.endpoint)?;
    Ok(())
}

fn validate_resource(name: &str, resource: &ResourceConfig) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(PagewatchError::ConfigError(format!(
            "resource name '{name}' cannot be used as a cache file name"
        )));
    }

    parse_http_url(&format!("resource '{name}' url"), &resource.url)?;
    for companion in resource.companions.iter() {
        parse_http_url(&format!("resource '{name}' companion"), companion.url())?;
    }

    match resource.kind {
        SnapshotKind::Digest => {
            if resource.selector.is_some() {
                return Err(PagewatchError::ConfigError(format!(
                    "resource '{name}' sets `selector` but kind is \"digest\""
                )));
            }
            if !resource.monitored.is_empty() {
                return Err(PagewatchError::ConfigError(format!(
                    "resource '{name}' sets `monitored` but kind is \"digest\""
                )));
            }
            if resource.report_all {
                return Err(PagewatchError::ConfigError(format!(
                    "resource '{name}' sets `report_all` but kind is \"digest\""
                )));
            }
        }
        SnapshotKind::Labels => {
            let selector = resource.effective_selector();
            Selector::parse(selector).map_err(|e| {
                PagewatchError::ConfigError(format!(
                    "resource '{name}' has invalid selector '{selector}': {e}"
                ))
            })?;
        }
    }

    Ok(())
}

fn parse_http_url(what: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| PagewatchError::ConfigError(format!("{what} '{raw}' is not a valid url: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PagewatchError::ConfigError(format!(
            "{what} '{raw}' must use http or https (got '{other}')"
        ))),
    }
}
