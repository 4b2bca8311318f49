// src/lib.rs

pub mod capture;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod fs;
pub mod logging;
pub mod notify;
pub mod report;
pub mod schedule;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod watcher;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use crate::capture::ScreenshotApiCapture;
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::errors::{PagewatchError, Result};
use crate::fetch::{build_client, HttpFetcher};
use crate::fs::RealFileSystem;
use crate::notify::{LogNotifier, Notifier, NotifyDispatcher, TelegramNotifier};
use crate::report::{PageInfo, Reporter};
use crate::schedule::{parse_hhmm, SchedulePolicy};
use crate::store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use crate::types::{CacheBackend, SnapshotKind};
use crate::watcher::{CheckOutcome, ResourceSpec, Watcher};

/// Per-resource outcomes of one invocation, in check order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, CheckOutcome)>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| o.is_success())
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ credentials from the environment)
/// - the schedule policy and the local time of this run
/// - notifier / screenshot collaborators behind the reporter
/// - the snapshot store and the watcher
///
/// and then checks the selected resources one after another.
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let selected = select_resources(&cfg, &args.resources)?;

    let schedule = SchedulePolicy::from_config(cfg.schedule.as_ref())?;
    let at = match args.at.as_deref() {
        Some(s) => parse_hhmm(s)?,
        None => schedule.local_now(),
    };

    if args.dry_run {
        print_dry_run(&cfg, &selected, &schedule, at);
        return Ok(RunSummary::default());
    }

    let mut reporter = build_reporter(&cfg, schedule, at)?;
    for name in selected.iter() {
        reporter = reporter.with_page(name, PageInfo::from_config(&cfg.resource[name]));
    }

    let mut watcher = Watcher::new(build_store(&cfg));
    let client = build_client(&cfg.config)?;

    reporter.announce_start().await;

    let mut summary = RunSummary::default();
    for name in selected.iter() {
        let resource = &cfg.resource[name];
        let spec = ResourceSpec::from_config(name, resource);
        let fetcher = HttpFetcher::new(client.clone(), resource);

        info!(resource = %name, url = %resource.url, kind = %resource.kind, "checking resource");
        let outcome = watcher.check(&spec, &fetcher, &mut reporter).await;
        debug!(resource = %name, ?outcome, "check finished");
        summary.outcomes.push((name.clone(), outcome));
    }

    reporter.announce_stop().await;

    Ok(summary)
}

/// Resolve `--resource` names, defaulting to every enabled resource.
fn select_resources(cfg: &ConfigFile, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(cfg.enabled_resources().map(|(name, _)| name.clone()).collect());
    }

    let mut selected = Vec::new();
    for name in requested {
        if !cfg.resource.contains_key(name) {
            return Err(PagewatchError::ConfigError(format!(
                "unknown resource '{name}' (see [resource.<name>] sections)"
            )));
        }
        if !selected.contains(name) {
            selected.push(name.clone());
        }
    }
    Ok(selected)
}

fn build_store(cfg: &ConfigFile) -> Box<dyn SnapshotStore> {
    match cfg.config.cache_backend {
        CacheBackend::File => {
            Box::new(FileSnapshotStore::from_config(cfg, Arc::new(RealFileSystem)))
        }
        CacheBackend::Memory => Box::new(MemorySnapshotStore::new()),
    }
}

fn build_reporter(cfg: &ConfigFile, schedule: SchedulePolicy, at: NaiveTime) -> Result<Reporter> {
    let notifier: Box<dyn Notifier> = match (&cfg.notify.token, &cfg.notify.chat_id) {
        (Some(token), Some(chat_id)) if cfg.notify.has_credentials() => {
            Box::new(TelegramNotifier::new(&cfg.notify.endpoint, token, chat_id)?)
        }
        _ => {
            warn!("missing notification credentials; messages will only be logged");
            Box::new(LogNotifier)
        }
    };

    let mut reporter = Reporter::new(NotifyDispatcher::new(notifier), schedule, at);

    let wants_capture = cfg.enabled_resources().any(|(_, r)| r.capture);
    match cfg.capture.access_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            let capture = ScreenshotApiCapture::new(&cfg.capture.endpoint, key)?;
            reporter = reporter.with_capture(Box::new(capture));
        }
        _ if wants_capture => {
            warn!("capture enabled for a resource but no [capture].access_key; screenshots disabled");
        }
        _ => {}
    }

    Ok(reporter)
}

/// Simple dry-run output: print resources, cache locations and schedule.
fn print_dry_run(cfg: &ConfigFile, selected: &[String], schedule: &SchedulePolicy, at: NaiveTime) {
    let store = FileSnapshotStore::from_config(cfg, Arc::new(RealFileSystem));

    println!("pagewatch dry-run");
    println!("  config.cache_backend = {:?}", cfg.config.cache_backend);
    println!("  config.timeout_secs = {}", cfg.config.timeout_secs);
    println!("  notify.credentials = {}", cfg.notify.has_credentials());
    println!("  local time = {}", at.format("%H:%M"));
    println!("  start announcement due = {}", schedule.is_start(at));
    println!("  stop announcement due = {}", schedule.is_stop(at));
    println!("  unchanged reported = {}", schedule.reports_unchanged_at(at));
    println!();

    println!("resources ({}):", selected.len());
    for name in selected {
        let resource = &cfg.resource[name];
        println!("  - {name}");
        println!("      url: {}", resource.url);
        println!("      kind: {}", resource.kind);
        if resource.kind == SnapshotKind::Labels {
            println!("      selector: {}", resource.effective_selector());
            if !resource.monitored.is_empty() {
                println!("      monitored: {:?}", resource.monitored);
            }
            if resource.report_all {
                println!("      report_all: true");
            }
        }
        if cfg.config.cache_backend == CacheBackend::File {
            println!("      cache: {:?}", store.path_for(name));
        }
        if resource.capture {
            println!("      capture: true");
            for companion in resource.companions.iter() {
                println!("      companion: {}", companion.url());
            }
        }
    }

    debug!("dry-run complete (no fetches)");
}
