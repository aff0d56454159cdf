//! Boundary to the social platform.
//!
//! The dispatcher only talks to [`Provider`]. [`RedditProvider`] is the real
//! implementation; tests use a scripted one.

mod feed;
mod listing;
mod reddit;

pub use feed::{FeedBuffer, FeedItem};
pub use listing::{Listing, ListingData, MessageData, SubmissionData, Thing};
pub use reddit::RedditProvider;

use crate::MikasaResult;
use async_trait::async_trait;

/// A private message (or inbox reply) addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Platform id, unique across the inbox.
    pub id: String,
    /// Sender. `None` when the account is deleted or the message is from the system.
    pub author: Option<String>,
    pub body: String,
}

/// A new post in the watched community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSubmission {
    pub id: String,
    pub author: String,
    pub community: String,
    /// Link flair text. `None` when the post has no flair.
    pub flair: Option<String>,
    /// Direct link to the post.
    pub permalink: String,
}

/// Event source and message sink for one authenticated account.
///
/// Both polls return `Ok(None)` when nothing new is available; that is the
/// signal to switch to the other feed, not an error.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Next unhandled inbox item, if any.
    async fn poll_inbox(&mut self) -> MikasaResult<Option<InboundMessage>>;

    /// Next new submission in the watched community, if any.
    async fn poll_submissions(&mut self) -> MikasaResult<Option<InboundSubmission>>;

    /// Send a private message to `recipient`.
    async fn send_message(&self, recipient: &str, subject: &str, body: &str) -> MikasaResult<()>;
}

impl FeedItem for InboundMessage {
    fn feed_key(&self) -> &str {
        &self.id
    }
}

impl FeedItem for InboundSubmission {
    fn feed_key(&self) -> &str {
        &self.id
    }
}
