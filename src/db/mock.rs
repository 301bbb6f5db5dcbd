//! In-memory hand store for tests.

use super::{HandStore, InsertOutcome, ScanOrder, StoreError};
use crate::domain::{HandRecord, TimeWindow};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock store with hooks to simulate races and outages.
#[derive(Debug, Default)]
pub struct MockHandStore {
    hands: Mutex<Vec<HandRecord>>,
    /// Ids `find_hand` pretends not to see while `insert_hand` still reports
    /// them as duplicates, as if another writer got there first.
    hidden: Mutex<HashSet<String>>,
    /// Fail every insert after this many successful ones.
    fail_after: Option<usize>,
    inserted: AtomicUsize,
}

impl MockHandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hand(self, hand: HandRecord) -> Self {
        self.lock_hands().push(hand);
        self
    }

    /// Store `hand` but hide it from `find_hand`.
    pub fn with_racing_writer(self, hand: HandRecord) -> Self {
        if let Ok(mut hidden) = self.hidden.lock() {
            hidden.insert(hand.hand_id.clone());
        }
        self.with_hand(hand)
    }

    pub fn failing_after(mut self, inserts: usize) -> Self {
        self.fail_after = Some(inserts);
        self
    }

    pub fn len(&self) -> usize {
        self.lock_hands().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_hands(&self) -> std::sync::MutexGuard<'_, Vec<HandRecord>> {
        self.hands.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_hidden(&self, hand_id: &str) -> bool {
        self.hidden
            .lock()
            .map(|h| h.contains(hand_id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl HandStore for MockHandStore {
    async fn insert_hand(&self, hand: &HandRecord) -> Result<InsertOutcome, StoreError> {
        let mut hands = self.lock_hands();
        if hands.iter().any(|h| h.hand_id == hand.hand_id) {
            return Ok(InsertOutcome::Duplicate);
        }
        if let Some(limit) = self.fail_after {
            if self.inserted.load(Ordering::SeqCst) >= limit {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
        }
        hands.push(hand.clone());
        self.inserted.fetch_add(1, Ordering::SeqCst);
        Ok(InsertOutcome::Inserted)
    }

    async fn find_hand(&self, hand_id: &str) -> Result<Option<HandRecord>, StoreError> {
        if self.is_hidden(hand_id) {
            return Ok(None);
        }
        Ok(self
            .lock_hands()
            .iter()
            .find(|h| h.hand_id == hand_id)
            .cloned())
    }

    async fn scan_hands(
        &self,
        order: ScanOrder,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<HandRecord>, StoreError> {
        let mut hands: Vec<HandRecord> = self
            .lock_hands()
            .iter()
            .filter(|h| window.map_or(true, |w| w.contains(&h.start_time)))
            .cloned()
            .collect();
        hands.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        if order == ScanOrder::NewestFirst {
            hands.reverse();
        }
        Ok(hands)
    }
}
