//! Deduplication ledger over the processed-id collections.

use crate::{Collection, Database, DatabaseResult};
use tracing::debug;

/// Answers "has this event id been handled" and records new ids.
///
/// Stateless apart from the borrowed [`Database`]. The check and the record
/// are separate calls; the caller must not interleave two handlers for the
/// same collection between them.
pub struct Ledger<'a> {
    db: &'a Database,
    retention: Option<usize>,
}

impl<'a> Ledger<'a> {
    /// `retention` caps how many ids each collection keeps; `None` keeps all.
    pub fn new(db: &'a Database, retention: Option<usize>) -> Self {
        Self { db, retention }
    }

    /// Whether `id` has been recorded in `collection`.
    pub fn has_seen(&self, collection: Collection, id: &str) -> DatabaseResult<bool> {
        self.db.contains(collection, id)
    }

    /// Record `id` in `collection`, then apply the retention cap.
    pub fn mark_seen(&self, collection: Collection, id: &str) -> DatabaseResult<()> {
        if !self.db.insert(collection, id)? {
            debug!(collection = %collection, id, "Id was already recorded");
            return Ok(());
        }

        if let Some(keep) = self.retention {
            self.db.retain_latest(collection, keep)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_then_has_seen() {
        let db = Database::open_in_memory().unwrap();
        let ledger = Ledger::new(&db, None);

        assert!(!ledger.has_seen(Collection::ProcessedMessages, "m1").unwrap());
        ledger.mark_seen(Collection::ProcessedMessages, "m1").unwrap();
        assert!(ledger.has_seen(Collection::ProcessedMessages, "m1").unwrap());
        assert!(!ledger
            .has_seen(Collection::ProcessedSubmissions, "m1")
            .unwrap());
    }

    #[test]
    fn test_repeated_mark_does_not_grow() {
        let db = Database::open_in_memory().unwrap();
        let ledger = Ledger::new(&db, None);

        ledger.mark_seen(Collection::ProcessedMessages, "m1").unwrap();
        ledger.mark_seen(Collection::ProcessedMessages, "m1").unwrap();

        assert_eq!(db.len(Collection::ProcessedMessages).unwrap(), 1);
    }

    #[test]
    fn test_retention_forgets_oldest_ids() {
        let db = Database::open_in_memory().unwrap();
        let ledger = Ledger::new(&db, Some(2));

        for id in ["s1", "s2", "s3"] {
            ledger.mark_seen(Collection::ProcessedSubmissions, id).unwrap();
        }

        assert!(!ledger.has_seen(Collection::ProcessedSubmissions, "s1").unwrap());
        assert!(ledger.has_seen(Collection::ProcessedSubmissions, "s2").unwrap());
        assert!(ledger.has_seen(Collection::ProcessedSubmissions, "s3").unwrap());
    }
}
