//! Submission filtering and recording.

use super::harness::{submission, test_settings, TestHarness};
use crate::context::BotSettings;
use crate::handlers::{handle_submission, SubmissionDisposition};
use bot_database::{Collection, Database};

#[tokio::test]
async fn paid_flair_notifies_subscribers() {
    let harness = TestHarness::new();
    harness.seed_subscribers(&["alice"]);

    let disposition = handle_submission(harness.ctx(), submission("1abcd", Some("Paid - $20")))
        .await
        .unwrap();

    match disposition {
        SubmissionDisposition::Notified(report) => {
            assert_eq!(report.attempted, 1);
            assert_eq!(report.delivered, 1);
        }
        other => panic!("expected notification, got {other:?}"),
    }
    assert_eq!(harness.provider.sent_to("alice").len(), 1);
}

#[tokio::test]
async fn unpaid_and_missing_flair_do_not_qualify() {
    let harness = TestHarness::new();
    harness.seed_subscribers(&["alice"]);

    let unpaid = handle_submission(harness.ctx(), submission("1a", Some("Unpaid")))
        .await
        .unwrap();
    let bare = handle_submission(harness.ctx(), submission("1b", None))
        .await
        .unwrap();

    assert_eq!(unpaid, SubmissionDisposition::NotQualified);
    assert_eq!(bare, SubmissionDisposition::NotQualified);
    assert_eq!(harness.provider.sent_count(), 0);

    // Non-qualifying submissions are still recorded.
    let recorded = harness.db().get(Collection::ProcessedSubmissions).unwrap();
    assert_eq!(recorded, vec!["1a", "1b"]);
}

#[tokio::test]
async fn submission_is_recorded_once() {
    let harness = TestHarness::new();
    harness.seed_subscribers(&["alice"]);

    handle_submission(harness.ctx(), submission("1abcd", Some("Paid")))
        .await
        .unwrap();
    let again = handle_submission(harness.ctx(), submission("1abcd", Some("Paid")))
        .await
        .unwrap();

    assert_eq!(again, SubmissionDisposition::Duplicate);
    assert_eq!(harness.provider.sent_count(), 1);
    assert_eq!(harness.db().len(Collection::ProcessedSubmissions).unwrap(), 1);
}

#[tokio::test]
async fn flair_keyword_comes_from_settings() {
    let settings = BotSettings {
        flair_keyword: "bounty".to_string(),
        ..test_settings()
    };
    let harness = TestHarness::with_settings(Database::open_in_memory().unwrap(), settings);
    harness.seed_subscribers(&["alice"]);

    let paid = handle_submission(harness.ctx(), submission("1a", Some("Paid")))
        .await
        .unwrap();
    let bounty = handle_submission(harness.ctx(), submission("1b", Some("Bounty: $5")))
        .await
        .unwrap();

    assert_eq!(paid, SubmissionDisposition::NotQualified);
    assert!(matches!(bounty, SubmissionDisposition::Notified(_)));
}

#[tokio::test]
async fn ledger_retention_trims_oldest_ids() {
    let settings = BotSettings {
        ledger_retention: Some(2),
        ..test_settings()
    };
    let harness = TestHarness::with_settings(Database::open_in_memory().unwrap(), settings);

    for id in ["1a", "1b", "1c"] {
        handle_submission(harness.ctx(), submission(id, None))
            .await
            .unwrap();
    }

    assert_eq!(
        harness.db().get(Collection::ProcessedSubmissions).unwrap(),
        vec!["1b", "1c"]
    );
}
