//! Listing JSON returned by the Reddit API.

use super::{InboundMessage, InboundSubmission};
use serde::Deserialize;

/// Author name the API reports for deleted accounts.
const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

impl<T> Listing<T> {
    /// The listing's items in API order (newest first).
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|t| t.data).collect()
    }
}

/// Inbox entry: a private message (`t4`) or a comment reply (`t1`).
#[derive(Debug, Deserialize)]
pub struct MessageData {
    /// Fullname, e.g. `t4_2x9k1`. Unique across kinds.
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionData {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    pub subreddit: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
}

fn live_author(author: Option<String>) -> Option<String> {
    author.filter(|a| !a.is_empty() && a != DELETED_AUTHOR)
}

impl From<MessageData> for InboundMessage {
    fn from(data: MessageData) -> Self {
        Self {
            id: data.name,
            author: live_author(data.author),
            body: data.body,
        }
    }
}

impl From<SubmissionData> for InboundSubmission {
    fn from(data: SubmissionData) -> Self {
        Self {
            permalink: format!("https://redd.it/{}", data.id),
            author: live_author(data.author).unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            community: data.subreddit,
            flair: data.link_flair_text.filter(|f| !f.trim().is_empty()),
            id: data.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INBOX_JSON: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {"kind": "t4", "data": {"id": "2x9k1", "name": "t4_2x9k1", "author": "alice", "body": "Subscribe please", "subject": "hi"}},
                {"kind": "t1", "data": {"id": "kq01", "name": "t1_kq01", "author": "[deleted]", "body": "unsubscribe"}},
                {"kind": "t4", "data": {"id": "2x9k0", "name": "t4_2x9k0", "author": null, "body": "welcome"}}
            ]
        }
    }"#;

    const SUBMISSIONS_JSON: &str = r#"{
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t3", "data": {"id": "1abcd", "author": "requester", "subreddit": "PhotoshopRequest", "link_flair_text": "Paid - $20", "title": "fix my photo"}},
                {"kind": "t3", "data": {"id": "1abcc", "author": "someone", "subreddit": "PhotoshopRequest", "link_flair_text": null}},
                {"kind": "t3", "data": {"id": "1abcb", "author": "other", "subreddit": "PhotoshopRequest", "link_flair_text": ""}}
            ]
        }
    }"#;

    #[test]
    fn test_parse_inbox_listing() {
        let listing: Listing<MessageData> = serde_json::from_str(INBOX_JSON).unwrap();
        let messages: Vec<InboundMessage> =
            listing.into_items().into_iter().map(Into::into).collect();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, "t4_2x9k1");
        assert_eq!(messages[0].author.as_deref(), Some("alice"));
        assert_eq!(messages[0].body, "Subscribe please");
        assert_eq!(messages[1].id, "t1_kq01");
        assert_eq!(messages[1].author, None);
        assert_eq!(messages[2].author, None);
    }

    #[test]
    fn test_parse_submission_listing() {
        let listing: Listing<SubmissionData> = serde_json::from_str(SUBMISSIONS_JSON).unwrap();
        let submissions: Vec<InboundSubmission> =
            listing.into_items().into_iter().map(Into::into).collect();

        assert_eq!(submissions[0].id, "1abcd");
        assert_eq!(submissions[0].flair.as_deref(), Some("Paid - $20"));
        assert_eq!(submissions[0].permalink, "https://redd.it/1abcd");
        assert_eq!(submissions[0].community, "PhotoshopRequest");
        assert_eq!(submissions[1].flair, None);
        assert_eq!(submissions[2].flair, None);
    }

    #[test]
    fn test_empty_listing() {
        let listing: Listing<SubmissionData> =
            serde_json::from_str(r#"{"kind": "Listing", "data": {}}"#).unwrap();
        assert!(listing.into_items().is_empty());
    }
}
