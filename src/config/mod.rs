// src/config/mod.rs

//! Configuration loading and validation for pagewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer credentials from the
//!   environment on top (`loader.rs`).
//! - Validate urls, selectors and schedule strings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, load_and_validate, load_from_path};
pub use model::{
    CaptureSection, CompanionConfig, ConfigFile, ConfigSection, NotifySection, RawConfigFile,
    ResourceConfig, ScheduleSection,
};
