//! Per-item handlers for the two feeds.
//!
//! Both handlers record the item id in the ledger before acting on it. If the
//! reply or a notification fails afterwards, the item is not retried.

use crate::command::{Action, Outcome};
use crate::context::BotContext;
use crate::notifier::{is_paid_request, notify_subscribers, NotifyReport};
use crate::provider::{InboundMessage, InboundSubmission, Provider};
use crate::MikasaResult;
use bot_database::Collection;
use tracing::{debug, info, warn};

/// What happened to an inbox item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxDisposition {
    /// Already handled earlier; nothing was done.
    Duplicate,
    /// No live author to answer; the id was still recorded.
    NoAuthor,
    /// The command was applied and the reply sent.
    Replied(Outcome),
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionDisposition {
    Duplicate,
    /// Recorded, but the flair does not mark a paid request.
    NotQualified,
    Notified(NotifyReport),
}

/// Handle one inbox item: interpret its command, update the registry and
/// reply to the author.
pub async fn handle_inbox<P: Provider>(
    ctx: &BotContext<P>,
    message: InboundMessage,
) -> MikasaResult<InboxDisposition> {
    let ledger = ctx.ledger();
    if ledger.has_seen(Collection::ProcessedMessages, &message.id)? {
        debug!(message_id = %message.id, "Inbox item already processed");
        return Ok(InboxDisposition::Duplicate);
    }
    ledger.mark_seen(Collection::ProcessedMessages, &message.id)?;

    let Some(author) = message.author.as_deref() else {
        warn!(message_id = %message.id, "Inbox item has no author, skipping reply");
        return Ok(InboxDisposition::NoAuthor);
    };

    let registry = ctx.registry();
    let outcome = Outcome::for_message(&message.body, registry.is_subscribed(author)?);
    match outcome.action() {
        Action::Subscribe => registry.subscribe(author)?,
        Action::Unsubscribe => registry.unsubscribe(author)?,
        Action::None => {}
    }

    let reply = outcome.reply();
    ctx.provider
        .send_message(author, reply.subject, &reply.body)
        .await?;

    info!(
        message_id = %message.id,
        author = %author,
        outcome = ?outcome,
        "Inbox item handled"
    );
    Ok(InboxDisposition::Replied(outcome))
}

/// Handle one submission: record it and, if its flair qualifies, notify
/// every subscriber.
pub async fn handle_submission<P: Provider>(
    ctx: &BotContext<P>,
    submission: InboundSubmission,
) -> MikasaResult<SubmissionDisposition> {
    let ledger = ctx.ledger();
    if ledger.has_seen(Collection::ProcessedSubmissions, &submission.id)? {
        debug!(submission_id = %submission.id, "Submission already processed");
        return Ok(SubmissionDisposition::Duplicate);
    }
    ledger.mark_seen(Collection::ProcessedSubmissions, &submission.id)?;

    if !is_paid_request(submission.flair.as_deref(), &ctx.settings.flair_keyword) {
        debug!(
            submission_id = %submission.id,
            flair = ?submission.flair,
            "Submission does not qualify"
        );
        return Ok(SubmissionDisposition::NotQualified);
    }

    let report = notify_subscribers(&ctx.provider, &ctx.registry(), &submission).await?;
    Ok(SubmissionDisposition::Notified(report))
}
