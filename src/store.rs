//! The in-memory shift store.
//!
//! Holds at most one [`ShiftRecord`] per date, always in ascending date order.
//! Writes are last-write-wins per date. Record ids are unique across dates.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::YearMonth;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::ShiftRecord;

/// Date-ordered collection of shift records, one per date.
///
/// # Example
///
/// ```
/// use shift_calendar::models::{Position, ShiftEntry, ShiftRecord};
/// use shift_calendar::store::ShiftStore;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let shift = |id: &str, pos| {
///     ShiftRecord::single(id, date, ShiftEntry::new("08:00 - 16:00".parse().unwrap(), pos), "x")
/// };
///
/// let mut store = ShiftStore::new();
/// store.upsert(shift("a", Position::Kitchen)).unwrap();
/// store.upsert(shift("b", Position::Cashier)).unwrap();
///
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.get(date).unwrap().id, "b");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftStore {
    records: Vec<ShiftRecord>,
}

impl ShiftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from decoded records.
    ///
    /// Records that share a date are merged into one: the first keeps its id
    /// and location and gains the later records' entries in order. A record
    /// whose id is already taken by an earlier date gets a fresh id.
    pub fn from_parsed(records: impl IntoIterator<Item = ShiftRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Replaces the whole contents, merging same-date records as
    /// [`ShiftStore::from_parsed`] does.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = ShiftRecord>) {
        let mut incoming: Vec<ShiftRecord> = records.into_iter().collect();
        incoming.sort_by_key(|r| r.date);

        let mut merged: Vec<ShiftRecord> = Vec::with_capacity(incoming.len());
        for record in incoming {
            match merged.last_mut() {
                Some(last) if last.date == record.date => {
                    debug!(date = %record.date, id = %record.id, "Merging same-day calendar event");
                    last.entries.extend(record.entries);
                }
                _ => merged.push(record),
            }
        }

        let mut seen = HashSet::with_capacity(merged.len());
        for record in &mut merged {
            if !seen.insert(record.id.clone()) {
                let fresh = Uuid::new_v4().to_string();
                debug!(date = %record.date, id = %record.id, fresh = %fresh, "Reassigning duplicate shift id");
                record.id = fresh.clone();
                seen.insert(fresh);
            }
        }
        self.records = merged;
    }

    /// Inserts `record`, replacing any record with the same date.
    ///
    /// Returns the record it replaced. Fails with
    /// [`ScheduleError::DuplicateId`] when a record on another date already
    /// uses the id; the store is left unchanged.
    pub fn upsert(&mut self, record: ShiftRecord) -> ScheduleResult<Option<ShiftRecord>> {
        if let Some(existing) = self
            .records
            .iter()
            .find(|r| r.id == record.id && r.date != record.date)
        {
            return Err(ScheduleError::DuplicateId {
                id: record.id,
                existing: existing.date,
            });
        }

        let replaced = self
            .records
            .iter()
            .position(|r| r.date == record.date)
            .map(|index| self.records.remove(index));

        self.records.push(record);
        self.records.sort_by_key(|r| r.date);
        Ok(replaced)
    }

    /// Removes the record on `date`, if any.
    pub fn remove(&mut self, date: NaiveDate) -> Option<ShiftRecord> {
        let index = self.records.iter().position(|r| r.date == date)?;
        Some(self.records.remove(index))
    }

    /// The first record dated on or after `today`.
    pub fn next_upcoming(&self, today: NaiveDate) -> Option<&ShiftRecord> {
        let index = self.records.partition_point(|r| r.date < today);
        self.records.get(index)
    }

    /// Records dated within `month`, in ascending order.
    pub fn by_month(&self, month: YearMonth) -> &[ShiftRecord] {
        let from = self.records.partition_point(|r| r.date < month.first_day());
        let to = self.records.partition_point(|r| r.date <= month.last_day());
        &self.records[from..to]
    }

    /// The record on `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&ShiftRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|index| &self.records[index])
    }

    /// All records, ascending by date.
    pub fn records(&self) -> &[ShiftRecord] {
        &self.records
    }

    /// Iterates over records in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, ShiftRecord> {
        self.records.iter()
    }

    /// Number of records (dates), not entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a ShiftStore {
    type Item = &'a ShiftRecord;
    type IntoIter = std::slice::Iter<'a, ShiftRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, ShiftEntry};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn record(id: &str, date: &str, position: Position) -> ShiftRecord {
        ShiftRecord::single(
            id,
            make_date(date),
            ShiftEntry::new("08:00 - 16:00".parse().unwrap(), position),
            "Main Street",
        )
    }

    #[test]
    fn test_upsert_keeps_ascending_order() {
        let mut store = ShiftStore::new();
        store.upsert(record("c", "2026-01-20", Position::Kitchen)).unwrap();
        store.upsert(record("a", "2026-01-02", Position::Kitchen)).unwrap();
        store.upsert(record("b", "2026-01-10", Position::Kitchen)).unwrap();

        let ids: Vec<&str> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_same_date_replaces() {
        let mut store = ShiftStore::new();
        assert!(store.upsert(record("a", "2026-01-05", Position::Kitchen)).unwrap().is_none());
        let replaced = store.upsert(record("b", "2026-01-05", Position::Runner)).unwrap();

        assert_eq!(replaced.unwrap().id, "a");
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].entries[0].position, Position::Runner);
    }

    #[test]
    fn test_upsert_same_id_same_date_replaces() {
        let mut store = ShiftStore::new();
        store.upsert(record("a", "2026-01-05", Position::Kitchen)).unwrap();
        let replaced = store.upsert(record("a", "2026-01-05", Position::Lobby)).unwrap();
        assert_eq!(replaced.unwrap().entries[0].position, Position::Kitchen);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_rejects_id_used_on_another_date() {
        let mut store = ShiftStore::new();
        store.upsert(record("a", "2026-01-05", Position::Kitchen)).unwrap();

        let result = store.upsert(record("a", "2026-01-06", Position::Lobby));
        match result {
            Err(ScheduleError::DuplicateId { id, existing }) => {
                assert_eq!(id, "a");
                assert_eq!(existing, make_date("2026-01-05"));
            }
            other => panic!("Expected DuplicateId, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
        assert!(store.get(make_date("2026-01-06")).is_none());
    }

    #[test]
    fn test_from_parsed_reassigns_duplicate_ids() {
        let store = ShiftStore::from_parsed(vec![
            record("same", "2026-01-05", Position::Kitchen),
            record("same", "2026-01-07", Position::Kitchen),
            record("same", "2026-01-09", Position::Kitchen),
        ]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[0].id, "same");
        let ids: HashSet<&str> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_from_parsed_merges_same_date() {
        let mut second = record("b", "2026-01-05", Position::Lobby);
        second.location = "Elsewhere".to_string();

        let store = ShiftStore::from_parsed(vec![
            record("c", "2026-01-06", Position::Kitchen),
            record("a", "2026-01-05", Position::Sink),
            second,
        ]);

        assert_eq!(store.len(), 2);
        let merged = store.get(make_date("2026-01-05")).unwrap();
        assert_eq!(merged.id, "a");
        assert_eq!(merged.location, "Main Street");
        let positions: Vec<Position> = merged.entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![Position::Sink, Position::Lobby]);
    }

    #[test]
    fn test_next_upcoming_includes_today() {
        let store = ShiftStore::from_parsed(vec![
            record("a", "2026-01-02", Position::Kitchen),
            record("b", "2026-01-10", Position::Kitchen),
        ]);

        assert_eq!(store.next_upcoming(make_date("2026-01-10")).unwrap().id, "b");
        assert_eq!(store.next_upcoming(make_date("2026-01-03")).unwrap().id, "b");
        assert_eq!(store.next_upcoming(make_date("2026-01-01")).unwrap().id, "a");
        assert!(store.next_upcoming(make_date("2026-01-11")).is_none());
    }

    #[test]
    fn test_by_month_filters_and_orders() {
        let store = ShiftStore::from_parsed(vec![
            record("dec", "2025-12-31", Position::Kitchen),
            record("jan2", "2026-01-31", Position::Kitchen),
            record("jan1", "2026-01-01", Position::Kitchen),
            record("feb", "2026-02-01", Position::Kitchen),
        ]);

        let january = store.by_month(YearMonth::new(2026, 1).unwrap());
        let ids: Vec<&str> = january.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["jan1", "jan2"]);

        assert!(store.by_month(YearMonth::new(2026, 3).unwrap()).is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = ShiftStore::from_parsed(vec![
            record("a", "2026-01-02", Position::Kitchen),
            record("b", "2026-01-03", Position::Kitchen),
        ]);

        assert_eq!(store.remove(make_date("2026-01-02")).unwrap().id, "a");
        assert!(store.remove(make_date("2026-01-02")).is_none());
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
        assert!(store.next_upcoming(make_date("2000-01-01")).is_none());
    }
}
