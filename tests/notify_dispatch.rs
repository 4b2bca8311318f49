// tests/notify_dispatch.rs

mod common;
use crate::common::fakes::{RecordingNotifier, Sent};
use crate::common::init_tracing;

use pagewatch::capture::CapturedImage;
use pagewatch::notify::dispatch::MAX_FAILURE_REPORT_DEPTH;
use pagewatch::notify::NotifyDispatcher;

#[tokio::test]
async fn delivered_message_is_sent_once() {
    init_tracing();

    let notifier = RecordingNotifier::new();
    let dispatcher = NotifyDispatcher::new(Box::new(notifier.clone()));

    assert!(dispatcher.text("hello").await);
    assert_eq!(notifier.attempts(), vec![Sent::Text("hello".into())]);
}

#[tokio::test]
async fn failed_message_is_followed_by_one_failure_report() {
    init_tracing();

    let notifier = RecordingNotifier::failing_first(1);
    let dispatcher = NotifyDispatcher::new(Box::new(notifier.clone()));

    assert!(!dispatcher.text("site changed").await);

    let texts = notifier.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "site changed");
    assert!(texts[1].contains("Notification delivery failed"));
    assert!(texts[1].contains("simulated outage"));
}

#[tokio::test]
async fn persistent_outage_does_not_recurse() {
    init_tracing();

    let notifier = RecordingNotifier::always_failing();
    let dispatcher = NotifyDispatcher::new(Box::new(notifier.clone()));

    assert!(!dispatcher.text("first").await);
    assert_eq!(notifier.attempts().len(), 1 + MAX_FAILURE_REPORT_DEPTH);

    assert!(!dispatcher.text("second").await);
    assert_eq!(notifier.attempts().len(), 2 * (1 + MAX_FAILURE_REPORT_DEPTH));
}

#[tokio::test]
async fn failed_photo_is_reported_as_text() {
    init_tracing();

    let notifier = RecordingNotifier::failing_first(1);
    let dispatcher = NotifyDispatcher::new(Box::new(notifier.clone()));
    let image = CapturedImage::jpeg(vec![0xff, 0xd8], "page.jpg");

    assert!(!dispatcher.photo(&image, "caption").await);

    let attempts = notifier.attempts();
    assert_eq!(
        attempts[0],
        Sent::Photo {
            caption: "caption".into(),
            file_name: "page.jpg".into()
        }
    );
    assert!(matches!(&attempts[1], Sent::Text(t) if t.contains("delivery failed")));
    assert_eq!(attempts.len(), 2);
}
