// tests/reporter.rs

mod common;
use crate::common::builders::ResourceConfigBuilder;
use crate::common::fakes::{FakeCapture, RecordingNotifier, Sent};
use crate::common::init_tracing;

use pagewatch::config::ScheduleSection;
use pagewatch::errors::PagewatchError;
use pagewatch::notify::NotifyDispatcher;
use pagewatch::report::{PageInfo, Reporter};
use pagewatch::schedule::{parse_hhmm, SchedulePolicy};
use pagewatch::snapshot::Snapshot;
use pagewatch::types::SnapshotKind;
use pagewatch::watcher::{ChangeEvent, EventSink, ResourceSpec};

const EMBASSY_URL: &str = "https://www.bmeia.gv.at/oeb-teheran";
const VFS_URL: &str = "https://visa.vfsglobal.com/irn/en/aut";

fn schedule() -> SchedulePolicy {
    let section = ScheduleSection {
        utc_offset: Some("+03:30".into()),
        report_times: vec!["09:00".into(), "14:00".into()],
        snapshot_times: vec!["09:00".into()],
        start_time: Some("06:00".into()),
        stop_time: Some("01:00".into()),
    };
    SchedulePolicy::from_config(Some(&section)).unwrap()
}

fn embassy_page() -> PageInfo {
    PageInfo::from_config(
        &ResourceConfigBuilder::digest(EMBASSY_URL)
            .capture(true)
            .companion(VFS_URL)
            .build(),
    )
}

fn reporter_at(
    time: &str,
    notifier: &RecordingNotifier,
    capture: &FakeCapture,
) -> Reporter {
    Reporter::new(
        NotifyDispatcher::new(Box::new(notifier.clone())),
        schedule(),
        parse_hhmm(time).unwrap(),
    )
    .with_capture(Box::new(capture.clone()))
    .with_page("embassy", embassy_page())
}

fn embassy() -> ResourceSpec {
    ResourceSpec::new("embassy", SnapshotKind::Digest)
}

#[tokio::test]
async fn changed_sends_text_then_page_and_companion_screenshots() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("10:17", &notifier, &capture);

    reporter.on_event(&embassy(), &ChangeEvent::Changed).await;

    let attempts = notifier.attempts();
    assert_eq!(attempts.len(), 3);
    assert_eq!(
        attempts[0],
        Sent::Text(format!("⚠️ Website changed!\n{EMBASSY_URL}"))
    );
    assert!(matches!(&attempts[1], Sent::Photo { caption, .. } if caption.contains("embassy changed")));
    assert!(matches!(&attempts[2], Sent::Photo { caption, .. } if caption == VFS_URL));

    let urls: Vec<String> = capture.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec![EMBASSY_URL.to_string(), VFS_URL.to_string()]);
}

#[tokio::test]
async fn unchanged_outside_report_times_is_silent() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("10:17", &notifier, &capture);

    reporter.on_event(&embassy(), &ChangeEvent::Unchanged).await;

    assert!(notifier.attempts().is_empty());
    assert!(capture.requests().is_empty());
}

#[tokio::test]
async fn unchanged_at_report_time_without_snapshot() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("14:00", &notifier, &capture);

    reporter.on_event(&embassy(), &ChangeEvent::Unchanged).await;

    assert_eq!(notifier.texts(), vec![format!("✅ No change\n{EMBASSY_URL}")]);
    assert!(capture.requests().is_empty());
}

#[tokio::test]
async fn unchanged_at_snapshot_time_attaches_screenshots() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("09:00", &notifier, &capture);

    reporter.on_event(&embassy(), &ChangeEvent::Unchanged).await;

    assert_eq!(notifier.attempts().len(), 3);
    assert_eq!(capture.requests().len(), 2);
}

#[tokio::test]
async fn capture_failure_is_skipped() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::failing();
    let mut reporter = reporter_at("10:17", &notifier, &capture);

    reporter.on_event(&embassy(), &ChangeEvent::Changed).await;

    assert_eq!(notifier.attempts().len(), 1);
    assert_eq!(capture.requests().len(), 2);
}

#[tokio::test]
async fn label_events_name_the_label() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("10:17", &notifier, &capture);
    let offices = ResourceSpec::new("offices", SnapshotKind::Labels);

    reporter
        .on_event(&offices, &ChangeEvent::Added("TEHERAN".into()))
        .await;
    reporter
        .on_event(&offices, &ChangeEvent::Removed("TOKIO".into()))
        .await;

    let texts = notifier.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("\"TEHERAN\" was added to offices"));
    assert!(texts[1].contains("\"TOKIO\" was removed from offices"));
    assert!(capture.requests().is_empty());
}

#[tokio::test]
async fn monitored_labels_get_the_prominent_message() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("10:17", &notifier, &capture);
    let offices = ResourceSpec::new("offices", SnapshotKind::Labels).with_monitored(["TEHERAN"]);

    reporter
        .on_event(&offices, &ChangeEvent::Added("TEHERAN".into()))
        .await;
    reporter
        .on_event(&offices, &ChangeEvent::Added("ANKARA".into()))
        .await;
    reporter
        .on_event(&offices, &ChangeEvent::Removed("TOKIO".into()))
        .await;

    let texts = notifier.texts();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].starts_with("🟢 \"TEHERAN\" was added to offices"));
    assert_eq!(texts[1], "ℹ️ \"ANKARA\" was added to offices");
    assert_eq!(texts[2], "ℹ️ \"TOKIO\" was removed from offices");
}

#[tokio::test]
async fn report_all_sends_the_label_list() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let listed = PageInfo::from_config(
        &ResourceConfigBuilder::labels("https://appointment.bmeia.gv.at")
            .report_all(true)
            .build(),
    );
    let mut reporter = reporter_at("10:17", &notifier, &capture)
        .with_page("offices", listed);
    let offices = ResourceSpec::new("offices", SnapshotKind::Labels);

    reporter
        .on_snapshot(&offices, &Snapshot::labels(["WIEN", "TEHERAN"]))
        .await;
    reporter
        .on_snapshot(&embassy(), &Snapshot::of_body("<html></html>"))
        .await;

    assert_eq!(notifier.texts(), vec!["📋 offices options:\n\nTEHERAN\nWIEN".to_string()]);
}

#[tokio::test]
async fn label_list_is_opt_in() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let quiet = PageInfo::from_config(
        &ResourceConfigBuilder::labels("https://appointment.bmeia.gv.at").build(),
    );
    let mut reporter = reporter_at("10:17", &notifier, &capture).with_page("offices", quiet);
    let offices = ResourceSpec::new("offices", SnapshotKind::Labels);

    reporter
        .on_snapshot(&offices, &Snapshot::labels(["WIEN"]))
        .await;

    assert!(notifier.attempts().is_empty());
}

#[tokio::test]
async fn first_observation_and_failure_messages() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();
    let mut reporter = reporter_at("10:17", &notifier, &capture);

    reporter
        .on_event(&embassy(), &ChangeEvent::FirstObservation)
        .await;
    let err = PagewatchError::Fetch("timed out fetching page".into());
    reporter.on_failure(&embassy(), &err).await;

    let texts = notifier.texts();
    assert_eq!(texts[0], format!("🟢 Started monitoring\n{EMBASSY_URL}"));
    assert!(texts[1].starts_with("❌ Error checking embassy"));
    assert!(texts[1].contains("timed out"));
}

#[tokio::test]
async fn start_and_stop_announcements_follow_schedule() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let capture = FakeCapture::new();

    let at_start = reporter_at("06:00", &notifier, &capture);
    assert!(at_start.announce_start().await);
    assert!(!at_start.announce_stop().await);

    let at_stop = reporter_at("01:00", &notifier, &capture);
    assert!(!at_stop.announce_start().await);
    assert!(at_stop.announce_stop().await);

    let texts = notifier.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].starts_with("🟢 Started monitoring:"));
    assert!(texts[0].contains(EMBASSY_URL));
    assert!(texts[1].starts_with("🔴 Stopped monitoring:"));
}
