//! Inbox command interpretation.
//!
//! A message body is matched case-insensitively for the keywords
//! `unsubscribe` and `subscribe` anywhere in the text. `unsubscribe` is
//! checked first, so a body containing both is an unsubscribe request.
//!
//! Reply texts live in [`REPLY_TEMPLATES`], indexed by [`Outcome`].

/// Signature appended to every message the bot sends.
pub const FOOTER: &str = "*^I ^am ^a ^bot, ^bleep, ^bloop*";

/// Command found in a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Subscribe,
    Unsubscribe,
    Unknown,
}

impl Command {
    pub fn parse(body: &str) -> Self {
        let body = body.to_lowercase();
        if body.contains("unsubscribe") {
            Command::Unsubscribe
        } else if body.contains("subscribe") {
            Command::Subscribe
        } else {
            Command::Unknown
        }
    }
}

/// What the registry should do for an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Subscribe,
    Unsubscribe,
    None,
}

/// Result of applying a command to the sender's current subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Subscribed = 0,
    AlreadySubscribed = 1,
    Unsubscribed = 2,
    AlreadyUnsubscribed = 3,
    NoCommand = 4,
}

impl Outcome {
    /// Decide the outcome of `command` for a sender whose status is `is_subscribed`.
    pub fn decide(command: Command, is_subscribed: bool) -> Self {
        match (command, is_subscribed) {
            (Command::Unsubscribe, true) => Outcome::Unsubscribed,
            (Command::Unsubscribe, false) => Outcome::AlreadyUnsubscribed,
            (Command::Subscribe, true) => Outcome::AlreadySubscribed,
            (Command::Subscribe, false) => Outcome::Subscribed,
            (Command::Unknown, _) => Outcome::NoCommand,
        }
    }

    /// Shorthand for `decide(Command::parse(body), is_subscribed)`.
    pub fn for_message(body: &str, is_subscribed: bool) -> Self {
        Self::decide(Command::parse(body), is_subscribed)
    }

    pub fn action(self) -> Action {
        match self {
            Outcome::Subscribed => Action::Subscribe,
            Outcome::Unsubscribed => Action::Unsubscribe,
            Outcome::AlreadySubscribed | Outcome::AlreadyUnsubscribed | Outcome::NoCommand => {
                Action::None
            }
        }
    }

    pub fn template(self) -> &'static ReplyTemplate {
        &REPLY_TEMPLATES[self as usize]
    }

    /// The reply to send to the author, footer included.
    pub fn reply(self) -> Reply {
        let template = self.template();
        Reply {
            subject: template.subject,
            body: format!("{}\n\n\n{}", template.body, FOOTER),
        }
    }
}

/// Subject and body text for one outcome.
#[derive(Debug)]
pub struct ReplyTemplate {
    pub outcome: Outcome,
    pub subject: &'static str,
    pub body: &'static str,
}

/// Reply texts; position `i` belongs to the outcome with discriminant `i`.
pub static REPLY_TEMPLATES: [ReplyTemplate; 5] = [
    ReplyTemplate {
        outcome: Outcome::Subscribed,
        subject: "successfully subscribed",
        body: "You have been successfully **subscribed** to receiving messages from this bot.",
    },
    ReplyTemplate {
        outcome: Outcome::AlreadySubscribed,
        subject: "Already subscribed",
        body: "You are trying to **subscribe** but it seems like **you are already on subscription list**.",
    },
    ReplyTemplate {
        outcome: Outcome::Unsubscribed,
        subject: "successfully unsubscribed",
        body: "You have been successfully **unsubscribed** from receiving messages from this bot.",
    },
    ReplyTemplate {
        outcome: Outcome::AlreadyUnsubscribed,
        subject: "Already unsubscribed",
        body: "You are trying to **unsubscribe** but it seems like **you are not on subscription list**.",
    },
    ReplyTemplate {
        outcome: Outcome::NoCommand,
        subject: "No command found",
        body: "I could not find a supported command in your message.\n\
               currently supported commands are:\n\n**subscribe**\n**unsubscribe**\n\n\
               These commands have to be in the body of the message.",
    },
];

/// A reply ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub subject: &'static str,
    pub body: String,
}
