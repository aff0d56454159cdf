//! Turns repeated listing fetches into a one-item-at-a-time stream.
//!
//! Listings come back newest first and overlap from one fetch to the next.
//! The buffer reverses each fetch to oldest-first, drops items it has already
//! handed out, and yields what is left one per poll.

use std::collections::{HashSet, VecDeque};

/// Number of recent keys remembered to suppress overlap between fetches.
/// One more than the largest listing page.
pub const DEFAULT_SEEN_CAPACITY: usize = 301;

/// Items that can be deduplicated by a stable key.
pub trait FeedItem {
    fn feed_key(&self) -> &str;
}

/// Pending items plus a bounded window of keys already yielded.
#[derive(Debug)]
pub struct FeedBuffer<T> {
    pending: VecDeque<T>,
    seen_order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl<T: FeedItem> FeedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            seen_order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Queue the unseen items of a newest-first fetch. Returns how many were queued.
    pub fn absorb(&mut self, newest_first: Vec<T>) -> usize {
        let mut queued = 0;
        for item in newest_first.into_iter().rev() {
            if self.remember(item.feed_key()) {
                self.pending.push_back(item);
                queued += 1;
            }
        }
        queued
    }

    /// Next queued item, oldest first.
    pub fn pop(&mut self) -> Option<T> {
        self.pending.pop_front()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn remember(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        if self.seen_order.len() == self.capacity {
            if let Some(oldest) = self.seen_order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen_order.push_back(key.to_string());
        self.seen.insert(key.to_string());
        true
    }
}

impl<T: FeedItem> Default for FeedBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SEEN_CAPACITY)
    }
}
