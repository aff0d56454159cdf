//! Inbox command handling.

use super::harness::{message, TestHarness};
use crate::command::Outcome;
use crate::handlers::{handle_inbox, InboxDisposition};
use crate::provider::InboundMessage;
use crate::MikasaError;
use bot_database::Collection;

#[tokio::test]
async fn subscribe_adds_non_member_and_confirms() {
    let harness = TestHarness::new();

    let disposition = handle_inbox(harness.ctx(), message("t4_1", "alice", "Subscribe"))
        .await
        .unwrap();

    assert_eq!(disposition, InboxDisposition::Replied(Outcome::Subscribed));
    assert!(harness.ctx().registry().is_subscribed("alice").unwrap());

    let sent = harness.provider.sent_to("alice");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "successfully subscribed");
}

#[tokio::test]
async fn second_subscribe_reports_already_subscribed_without_change() {
    let harness = TestHarness::new();

    handle_inbox(harness.ctx(), message("t4_1", "alice", "subscribe"))
        .await
        .unwrap();
    let disposition = handle_inbox(harness.ctx(), message("t4_2", "alice", "subscribe"))
        .await
        .unwrap();

    assert_eq!(
        disposition,
        InboxDisposition::Replied(Outcome::AlreadySubscribed)
    );
    assert_eq!(harness.ctx().registry().subscribers().unwrap(), vec!["alice"]);

    let sent = harness.provider.sent_to("alice");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].subject, "Already subscribed");
}

#[tokio::test]
async fn unsubscribe_removes_member_then_reports_already_unsubscribed() {
    let harness = TestHarness::new();
    harness.seed_subscribers(&["bob"]);

    let first = handle_inbox(harness.ctx(), message("t4_1", "bob", "UNSUBSCRIBE"))
        .await
        .unwrap();
    let second = handle_inbox(harness.ctx(), message("t4_2", "bob", "unsubscribe"))
        .await
        .unwrap();

    assert_eq!(first, InboxDisposition::Replied(Outcome::Unsubscribed));
    assert_eq!(
        second,
        InboxDisposition::Replied(Outcome::AlreadyUnsubscribed)
    );
    assert!(!harness.ctx().registry().is_subscribed("bob").unwrap());

    let subjects: Vec<String> = harness
        .provider
        .sent_to("bob")
        .into_iter()
        .map(|m| m.subject)
        .collect();
    assert_eq!(
        subjects,
        vec!["successfully unsubscribed", "Already unsubscribed"]
    );
}

#[tokio::test]
async fn body_without_keyword_gets_usage_reply_and_no_mutation() {
    let harness = TestHarness::new();

    let disposition = handle_inbox(harness.ctx(), message("t4_1", "carol", "hello there"))
        .await
        .unwrap();

    assert_eq!(disposition, InboxDisposition::Replied(Outcome::NoCommand));
    assert_eq!(harness.ctx().registry().count().unwrap(), 0);

    let sent = harness.provider.sent_to("carol");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "No command found");
    assert!(sent[0].body.contains("**subscribe**"));
}

#[tokio::test]
async fn body_with_both_keywords_is_an_unsubscribe() {
    let harness = TestHarness::new();
    harness.seed_subscribers(&["dave"]);

    let disposition = handle_inbox(
        harness.ctx(),
        message("t4_1", "dave", "please subscribe my unsubscribe request"),
    )
    .await
    .unwrap();

    assert_eq!(disposition, InboxDisposition::Replied(Outcome::Unsubscribed));
    assert!(!harness.ctx().registry().is_subscribed("dave").unwrap());
}

#[tokio::test]
async fn redelivered_message_gets_no_second_reply() {
    let harness = TestHarness::new();

    handle_inbox(harness.ctx(), message("t4_1", "alice", "subscribe"))
        .await
        .unwrap();
    assert!(harness
        .ctx()
        .ledger()
        .has_seen(Collection::ProcessedMessages, "t4_1")
        .unwrap());
    let recorded = harness.db().get(Collection::ProcessedMessages).unwrap();

    let disposition = handle_inbox(harness.ctx(), message("t4_1", "alice", "subscribe"))
        .await
        .unwrap();

    assert_eq!(disposition, InboxDisposition::Duplicate);
    assert_eq!(harness.provider.sent_count(), 1);
    assert_eq!(
        harness.db().get(Collection::ProcessedMessages).unwrap(),
        recorded
    );
}

#[tokio::test]
async fn message_without_author_is_recorded_but_not_answered() {
    let harness = TestHarness::new();
    let orphan = InboundMessage {
        id: "t4_9".to_string(),
        author: None,
        body: "subscribe".to_string(),
    };

    let disposition = handle_inbox(harness.ctx(), orphan).await.unwrap();

    assert_eq!(disposition, InboxDisposition::NoAuthor);
    assert_eq!(harness.provider.sent_count(), 0);
    assert!(harness
        .db()
        .contains(Collection::ProcessedMessages, "t4_9")
        .unwrap());
}

#[tokio::test]
async fn failed_reply_is_not_retried_on_redelivery() {
    let harness = TestHarness::new();
    harness.provider.fail_sends_to("erin");

    let result = handle_inbox(harness.ctx(), message("t4_1", "erin", "subscribe")).await;
    assert!(matches!(result, Err(MikasaError::Provider(_))));

    // The subscription happened before the reply failed, and the id is
    // recorded, so a redelivery is absorbed.
    assert!(harness.ctx().registry().is_subscribed("erin").unwrap());
    let again = handle_inbox(harness.ctx(), message("t4_1", "erin", "subscribe"))
        .await
        .unwrap();
    assert_eq!(again, InboxDisposition::Duplicate);
}
