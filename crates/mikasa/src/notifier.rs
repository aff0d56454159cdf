//! Flair qualification and subscriber fan-out.

use crate::command::FOOTER;
use crate::provider::{InboundSubmission, Provider};
use crate::MikasaResult;
use bot_database::Registry;
use tracing::{debug, info, warn};

/// Whether `flair` marks a paid request.
///
/// The case-folded flair must contain `keyword` as a whole word, so
/// "Paid - $20" and "[PAID]" qualify while "Unpaid" and "prepaid" do not.
/// A post without flair never qualifies.
pub fn is_paid_request(flair: Option<&str>, keyword: &str) -> bool {
    let Some(flair) = flair else {
        return false;
    };
    let flair = flair.to_lowercase();
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }

    flair.match_indices(&keyword).any(|(start, _)| {
        let before = flair[..start].chars().next_back();
        let after = flair[start + keyword.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Message sent to each subscriber for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn for_submission(submission: &InboundSubmission) -> Self {
        Self {
            subject: format!("New paid submission posted in {}", submission.community),
            body: format!(
                "New paid submission posted by u/{} in {}\n\nDirect link: {}\n\n\n{}",
                submission.author, submission.community, submission.permalink, FOOTER
            ),
        }
    }
}

/// Delivery counts for one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub attempted: usize,
    pub delivered: usize,
    /// Subscribers whose send failed.
    pub failed: Vec<String>,
}

/// Send `submission` to every current subscriber.
///
/// The subscriber list is read once up front. A failed send is logged and
/// recorded in the report; the remaining subscribers are still tried. Only a
/// failure to read the subscriber list is returned as an error.
pub async fn notify_subscribers<P: Provider + ?Sized>(
    provider: &P,
    registry: &Registry<'_>,
    submission: &InboundSubmission,
) -> MikasaResult<NotifyReport> {
    let subscribers = registry.subscribers()?;
    let notification = Notification::for_submission(submission);
    let mut report = NotifyReport::default();

    for subscriber in subscribers {
        report.attempted += 1;
        match provider
            .send_message(&subscriber, &notification.subject, &notification.body)
            .await
        {
            Ok(()) => {
                debug!(submission_id = %submission.id, subscriber = %subscriber, "Notified");
                report.delivered += 1;
            }
            Err(e) => {
                warn!(
                    submission_id = %submission.id,
                    subscriber = %subscriber,
                    error = %e,
                    "Notification failed"
                );
                report.failed.push(subscriber);
            }
        }
    }

    info!(
        submission_id = %submission.id,
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failed.len(),
        "Subscribers notified"
    );
    Ok(report)
}
