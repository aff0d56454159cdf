//! The three persisted collections.

use crate::DatabaseError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A named collection of strings in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Ids of private messages already answered.
    ProcessedMessages,
    /// Ids of submissions already evaluated.
    ProcessedSubmissions,
    /// Usernames subscribed to notifications.
    Subscribers,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::ProcessedMessages,
        Collection::ProcessedSubmissions,
        Collection::Subscribers,
    ];

    /// Key under which the collection is persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::ProcessedMessages => "processed_messages",
            Collection::ProcessedSubmissions => "processed_submissions",
            Collection::Subscribers => "subscribers",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DatabaseError::InvalidData(format!("unknown collection: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys() {
        assert_eq!(Collection::ProcessedMessages.as_str(), "processed_messages");
        assert_eq!(
            Collection::ProcessedSubmissions.to_string(),
            "processed_submissions"
        );
        assert_eq!("subscribers".parse::<Collection>().unwrap(), Collection::Subscribers);
        assert!("moderators".parse::<Collection>().is_err());
    }
}
