//! Subscriber registry.

use crate::{Collection, Database, DatabaseError, DatabaseResult};
use tracing::info;

/// Add, remove and query subscriber identities.
///
/// `subscribe` and `unsubscribe` are strict: calling them in the wrong state
/// is an error, so callers check [`Registry::is_subscribed`] first and pick
/// the reply that fits.
pub struct Registry<'a> {
    db: &'a Database,
}

impl<'a> Registry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn is_subscribed(&self, identity: &str) -> DatabaseResult<bool> {
        self.db.contains(Collection::Subscribers, identity)
    }

    /// Add `identity`. Fails with `AlreadySubscribed` if present.
    pub fn subscribe(&self, identity: &str) -> DatabaseResult<()> {
        if !self.db.insert(Collection::Subscribers, identity)? {
            return Err(DatabaseError::AlreadySubscribed(identity.to_string()));
        }
        info!(identity, "Subscriber added");
        Ok(())
    }

    /// Remove `identity`. Fails with `NotSubscribed` if absent.
    pub fn unsubscribe(&self, identity: &str) -> DatabaseResult<()> {
        if !self.db.remove(Collection::Subscribers, identity)? {
            return Err(DatabaseError::NotSubscribed(identity.to_string()));
        }
        info!(identity, "Subscriber removed");
        Ok(())
    }

    /// Snapshot of the current subscribers in subscription order.
    pub fn subscribers(&self) -> DatabaseResult<Vec<String>> {
        self.db.get(Collection::Subscribers)
    }

    pub fn count(&self) -> DatabaseResult<usize> {
        self.db.len(Collection::Subscribers)
    }
}
