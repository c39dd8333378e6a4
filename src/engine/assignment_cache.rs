// ==========================================
// Porter Rota - Per-date daily assignment cache
// ==========================================
// A date is either absent (uncomputed) or holds its computed records.
// Expansion of a date runs under that date's lock so concurrent callers
// for the same uncomputed date expand it once.
// ==========================================

use crate::domain::assignment::DailyAssignmentRecord;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

type DateLocks = StdMutex<HashMap<NaiveDate, Arc<Mutex<()>>>>;

#[derive(Default)]
pub struct DailyAssignmentCache {
    entries: RwLock<HashMap<NaiveDate, Vec<DailyAssignmentRecord>>>,
    date_locks: DateLocks,
}

fn lock_table(locks: &DateLocks) -> StdMutexGuard<'_, HashMap<NaiveDate, Arc<Mutex<()>>>> {
    // the table stays consistent even if a holder panicked
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Held while one date is being read or written.
///
/// Dropping the last guard (with nobody waiting) removes the date's entry.
pub struct DateLockGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    date: NaiveDate,
    locks: &'a DateLocks,
}

impl Drop for DateLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = lock_table(self.locks);
        // waiters hold a clone of the Arc, so a count of 1 means only the table is left
        if locks.get(&self.date).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.date);
        }
    }
}

impl DailyAssignmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, date: NaiveDate) -> Option<Vec<DailyAssignmentRecord>> {
        self.entries.read().await.get(&date).cloned()
    }

    pub async fn contains(&self, date: NaiveDate) -> bool {
        self.entries.read().await.contains_key(&date)
    }

    pub async fn insert(&self, date: NaiveDate, records: Vec<DailyAssignmentRecord>) {
        self.entries.write().await.insert(date, records);
    }

    /// Replace a cached record by id, or append it. No-op for uncomputed dates.
    pub async fn put_record(&self, record: DailyAssignmentRecord) {
        let mut entries = self.entries.write().await;
        if let Some(records) = entries.get_mut(&record.date) {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
        }
    }

    pub async fn remove_record(&self, date: NaiveDate, id: i64) {
        if let Some(records) = self.entries.write().await.get_mut(&date) {
            records.retain(|r| r.id != id);
        }
    }

    /// Forget a date so the next read goes back to the store.
    pub async fn invalidate(&self, date: NaiveDate) {
        self.entries.write().await.remove(&date);
    }

    pub async fn computed_dates(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Exclusive lock for one date; held across the store round trip.
    pub async fn lock_date(&self, date: NaiveDate) -> DateLockGuard<'_> {
        let lock = lock_table(&self.date_locks)
            .entry(date)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        DateLockGuard {
            guard: Some(lock.lock_owned().await),
            date,
            locks: &self.date_locks,
        }
    }

    /// Dates with a lock currently held or awaited.
    pub fn locked_dates(&self) -> usize {
        lock_table(&self.date_locks).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ShiftCategory;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    fn record(id: i64, date: NaiveDate, porter_id: i64) -> DailyAssignmentRecord {
        DailyAssignmentRecord {
            id,
            ..DailyAssignmentRecord::pending(date, 1, Some(porter_id), ShiftCategory::Day)
        }
    }

    #[tokio::test]
    async fn test_put_and_remove_only_touch_computed_dates() {
        let cache = DailyAssignmentCache::new();
        cache.put_record(record(1, d(27), 10)).await;
        assert!(!cache.contains(d(27)).await);

        cache.insert(d(27), vec![record(1, d(27), 10)]).await;
        cache.put_record(record(1, d(27), 11)).await;
        cache.put_record(record(2, d(27), 12)).await;

        let cached = cache.get(d(27)).await.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].porter_id, Some(11));

        cache.remove_record(d(27), 1).await;
        assert_eq!(cache.get(d(27)).await.unwrap().len(), 1);

        cache.invalidate(d(27)).await;
        assert_eq!(cache.computed_dates().await, 0);
    }

    #[tokio::test]
    async fn test_date_lock_is_per_date() {
        let cache = DailyAssignmentCache::new();
        let _first = cache.lock_date(d(27)).await;
        // another date is not blocked
        let _other = cache.lock_date(d(28)).await;

        let same =
            tokio::time::timeout(std::time::Duration::from_millis(50), cache.lock_date(d(27)))
                .await;
        assert!(same.is_err());
    }

    #[tokio::test]
    async fn test_released_date_locks_are_dropped() {
        let cache = DailyAssignmentCache::new();
        for day in 1..=20 {
            let _guard = cache.lock_date(d(day)).await;
            assert_eq!(cache.locked_dates(), 1);
        }
        assert_eq!(cache.locked_dates(), 0);
    }

    #[tokio::test]
    async fn test_date_lock_entry_survives_while_awaited() {
        let cache = Arc::new(DailyAssignmentCache::new());
        let first = cache.lock_date(d(27)).await;

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move {
                let _guard = cache.lock_date(d(27)).await;
                cache.locked_dates()
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // the waiter still needs the entry after the first holder leaves
        drop(first);
        assert_eq!(waiter.await.unwrap(), 1);
        assert_eq!(cache.locked_dates(), 0);
    }
}
