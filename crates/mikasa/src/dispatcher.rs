//! Round-robin loop over the inbox and submission feeds.

use crate::context::BotContext;
use crate::handlers::{handle_inbox, handle_submission, InboxDisposition, SubmissionDisposition};
use crate::provider::Provider;
use crate::{MikasaError, MikasaResult};
use tracing::{debug, error, info};

/// Counts for one drain of one feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Items the feed returned.
    pub received: usize,
    /// Items skipped by the ledger.
    pub duplicates: usize,
    /// Items whose handler failed on local state (store errors).
    pub failed: usize,
}

impl FeedReport {
    pub fn handled(&self) -> usize {
        self.received - self.duplicates - self.failed
    }
}

/// Counts for one inbox drain followed by one submission drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub inbox: FeedReport,
    pub submissions: FeedReport,
}

impl RoundReport {
    /// Neither feed had anything new.
    pub fn is_idle(&self) -> bool {
        self.inbox.received == 0 && self.submissions.received == 0
    }
}

/// Drives both feeds from a single task.
///
/// Each feed is drained until it reports nothing new, then the other feed
/// gets its turn. Handlers run to completion before the next poll, so the
/// store is only ever touched by one handler at a time.
pub struct Dispatcher<P> {
    ctx: BotContext<P>,
}

impl<P: Provider> Dispatcher<P> {
    pub fn new(ctx: BotContext<P>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &BotContext<P> {
        &self.ctx
    }

    pub fn into_context(self) -> BotContext<P> {
        self.ctx
    }

    /// Run forever.
    ///
    /// A round that fails with a transport error is logged and followed by
    /// `error_backoff`; a round with nothing new is followed by `idle_interval`.
    pub async fn run(&mut self) -> MikasaResult<()> {
        info!(
            community = %self.ctx.settings.community,
            flair_keyword = %self.ctx.settings.flair_keyword,
            "Starting dispatcher loop"
        );

        loop {
            match self.run_round().await {
                Ok(report) if report.is_idle() => {
                    tokio::time::sleep(self.ctx.settings.idle_interval).await;
                }
                Ok(report) => {
                    debug!(
                        inbox = report.inbox.received,
                        submissions = report.submissions.received,
                        "Round complete"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Round aborted");
                    tokio::time::sleep(self.ctx.settings.error_backoff).await;
                }
            }
        }
    }

    /// Drain the inbox, then the submission feed.
    pub async fn run_round(&mut self) -> MikasaResult<RoundReport> {
        let inbox = self.drain_inbox().await?;
        let submissions = self.drain_submissions().await?;
        Ok(RoundReport { inbox, submissions })
    }

    async fn drain_inbox(&mut self) -> MikasaResult<FeedReport> {
        let mut report = FeedReport::default();

        while let Some(message) = self.ctx.provider.poll_inbox().await? {
            report.received += 1;
            let message_id = message.id.clone();

            match handle_inbox(&self.ctx, message).await {
                Ok(InboxDisposition::Duplicate) => report.duplicates += 1,
                Ok(_) => {}
                Err(e) => absorb_local_failure(e, "inbox", &message_id, &mut report)?,
            }
        }

        Ok(report)
    }

    async fn drain_submissions(&mut self) -> MikasaResult<FeedReport> {
        let mut report = FeedReport::default();

        while let Some(submission) = self.ctx.provider.poll_submissions().await? {
            report.received += 1;
            let submission_id = submission.id.clone();

            match handle_submission(&self.ctx, submission).await {
                Ok(SubmissionDisposition::Duplicate) => report.duplicates += 1,
                Ok(_) => {}
                Err(e) => absorb_local_failure(e, "submission", &submission_id, &mut report)?,
            }
        }

        Ok(report)
    }
}

/// Store errors abort only the current handler; transport errors end the round
/// and are logged once by [`Dispatcher::run`].
fn absorb_local_failure(
    e: MikasaError,
    feed: &str,
    item_id: &str,
    report: &mut FeedReport,
) -> MikasaResult<()> {
    if e.is_transport() {
        return Err(e);
    }

    error!(feed, item_id, error = %e, "Handler failed");
    report.failed += 1;
    Ok(())
}
