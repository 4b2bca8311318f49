// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variables consulted for credentials, in priority order.
const TOKEN_VARS: &[&str] = &["PAGEWATCH_BOT_TOKEN", "BOT_TOKEN"];
const CHAT_ID_VARS: &[&str] = &["PAGEWATCH_CHAT_ID", "CHAT_ID"];
const CAPTURE_KEY_VARS: &[&str] = &["PAGEWATCH_CAPTURE_KEY", "APIFLASH_ACCESS_KEY"];

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate or
/// consult the environment. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, apply environment credential overrides and
/// validate the result.
///
/// This is the entry point used by the binary.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    apply_env_overrides(&mut raw_config, |key| std::env::var(key).ok());
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Fill credentials from the environment.
///
/// A non-empty variable wins over the file value, so secrets can stay out of
/// the config file. `lookup` is injected so callers (and tests) decide where
/// values come from.
pub fn apply_env_overrides<F>(raw: &mut RawConfigFile, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let first = |keys: &[&str]| {
        keys.iter().copied().find_map(|key| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .inspect(|_| debug!(var = %key, "credential taken from environment"))
        })
    };

    if let Some(token) = first(TOKEN_VARS) {
        raw.notify.token = Some(token);
    }
    if let Some(chat_id) = first(CHAT_ID_VARS) {
        raw.notify.chat_id = Some(chat_id);
    }
    if let Some(key) = first(CAPTURE_KEY_VARS) {
        raw.capture.access_key = Some(key);
    }
}
