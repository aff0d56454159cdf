//! Mikasa: subscription bot for paid requests.
//!
//! Mikasa watches two feeds of one account: private messages sent to the bot
//! and new submissions in a community. Messages carrying `subscribe` or
//! `unsubscribe` edit the subscriber list; submissions whose flair marks them
//! as paid are forwarded to every subscriber.
//!
//! # Core Invariants
//!
//! 1. **Once per id**: every message and submission id is handled at most once,
//!    across restarts (the ledger in `bot-database`)
//! 2. **One reply**: each handled message gets exactly one reply
//! 3. **Isolated fan-out**: a failed notification never stops the others
//! 4. **One task**: both feeds are polled round-robin from a single task, so
//!    the store needs no locking
//!
//! # Architecture
//!
//! ```text
//! Provider --poll_inbox------> Dispatcher -> handle_inbox -> Command -> reply
//!          --poll_submissions>            -> handle_submission -> Notifier -> send x N
//!                                  |
//!                               Database (Ledger, Registry)
//! ```

pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod provider;

#[cfg(test)]
mod tests;

pub use command::{Action, Command, Outcome, Reply};
pub use context::{BotContext, BotSettings};
pub use dispatcher::{Dispatcher, FeedReport, RoundReport};
pub use error::{MikasaError, MikasaResult};
pub use handlers::{handle_inbox, handle_submission, InboxDisposition, SubmissionDisposition};
pub use notifier::{is_paid_request, notify_subscribers, Notification, NotifyReport};
pub use provider::{InboundMessage, InboundSubmission, Provider, RedditProvider};
