//! Folds login records into per-day and per-user views.
//!
//! Both views are kept in ordered collections so iterating them yields the
//! same order the reports print in (dates ascending, users alphabetically).

use super::normalize::{extract_date, normalize_username, FormatError, UserFilter};
use super::types::RawRecord;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Date key (`YYYY-MM-DD`) → users who logged in that day
pub type DailyIndex = BTreeMap<String, BTreeSet<String>>;

/// Normalized user → dates the user logged in
pub type UserIndex = BTreeMap<String, BTreeSet<String>>;

/// A counted record whose timestamp could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {position} (user {user:?}): {source}")]
pub struct AggregateError {
    /// Zero-based position in the fetched record list
    pub position: usize,
    /// Normalized user name of the offending record
    pub user: String,
    #[source]
    pub source: FormatError,
}

/// Result of aggregating one run's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginIndex {
    pub by_day: DailyIndex,
    pub by_user: UserIndex,
    /// Records consumed
    pub records_seen: usize,
    /// Records that made it into the indices
    pub records_counted: usize,
}

impl LoginIndex {
    /// Record one login for an already-normalized user.
    pub fn insert(&mut self, date: &str, user: &str) {
        self.by_day
            .entry(date.to_string())
            .or_default()
            .insert(user.to_string());
        self.by_user
            .entry(user.to_string())
            .or_default()
            .insert(date.to_string());
    }

    /// Records left out by the user filter
    pub fn records_skipped(&self) -> usize {
        self.records_seen - self.records_counted
    }

    /// Number of distinct users across the whole range
    pub fn unique_users(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

/// Builds both indices from the fetched records in a single pass.
///
/// Records whose normalized user name is empty or excluded by `filter` are
/// skipped before their timestamp is looked at. A counted record with a
/// missing or malformed timestamp aborts the whole aggregation.
pub fn aggregate<'a, I>(records: I, filter: &UserFilter) -> Result<LoginIndex, AggregateError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut index = LoginIndex::default();

    for (position, record) in records.into_iter().enumerate() {
        index.records_seen += 1;

        let user = normalize_username(record.user_name());
        if filter.should_skip(&user) {
            continue;
        }

        let date = extract_date(record.time_stamp().unwrap_or("")).map_err(|source| {
            AggregateError {
                position,
                user: user.clone(),
                source,
            }
        })?;

        index.insert(date, &user);
        index.records_counted += 1;
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, ts: &str) -> RawRecord {
        RawRecord::new(Some(user), Some(ts))
    }

    fn assert_inverse(index: &LoginIndex) {
        for (date, users) in &index.by_day {
            for user in users {
                assert!(index.by_user[user].contains(date));
            }
        }
        for (user, dates) in &index.by_user {
            for date in dates {
                assert!(index.by_day[date].contains(user));
            }
        }
    }

    #[test]
    fn test_same_day_dedup() {
        let records = vec![
            record("Bob", "2025-07-20 10:00:00 PDT"),
            record("bob ", "2025-07-20 23:00:00 PDT"),
        ];

        let index = aggregate(&records, &UserFilter::default()).unwrap();

        assert_eq!(index.by_day.len(), 1);
        assert_eq!(
            index.by_day["2025-07-20"].iter().collect::<Vec<_>>(),
            vec!["bob"]
        );
        assert_eq!(index.by_user.len(), 1);
        assert_eq!(
            index.by_user["bob"].iter().collect::<Vec<_>>(),
            vec!["2025-07-20"]
        );
        assert_eq!(index.records_counted, 2);
    }

    #[test]
    fn test_indices_are_inverse() {
        let records = vec![
            record("alice", "2025-07-18 08:00:00"),
            record("Bob", "2025-07-18 09:00:00"),
            record("alice", "2025-07-19 08:00:00"),
            record("Carol  Ann", "2025-07-21 12:00:00"),
            record("bob", "2025-07-21 17:30:00"),
            record("ALICE", "2025-07-21 07:15:00"),
        ];

        let index = aggregate(&records, &UserFilter::default()).unwrap();
        assert_inverse(&index);

        assert_eq!(index.by_day["2025-07-21"].len(), 3);
        assert_eq!(index.by_user["alice"].len(), 3);
        assert!(index.by_user.contains_key("carol ann"));
        assert_eq!(index.unique_users(), 3);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let records = vec![
            record("alice", "2025-07-18 08:00:00"),
            record("dave", "2025-07-30 08:00:00"),
            record("alice", "2025-07-30 08:00:00"),
        ];

        let first = aggregate(&records, &UserFilter::default()).unwrap();
        let second = aggregate(&records, &UserFilter::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_system_excluded_by_default() {
        let records = vec![
            record("System", "2025-07-20 01:00:00"),
            record("alice", "2025-07-20 09:00:00"),
        ];

        let index = aggregate(&records, &UserFilter::default()).unwrap();
        assert!(!index.by_user.contains_key("system"));
        assert_eq!(index.by_day["2025-07-20"].len(), 1);
        assert_eq!(index.records_skipped(), 1);

        let index = aggregate(&records, &UserFilter::empty()).unwrap();
        assert!(index.by_user.contains_key("system"));
        assert_eq!(index.by_day["2025-07-20"].len(), 2);
        assert_eq!(index.records_skipped(), 0);
    }

    #[test]
    fn test_empty_and_null_users_skipped() {
        let records = vec![
            RawRecord::new(None, Some("2025-07-20 01:00:00")),
            record("   ", "2025-07-20 01:00:00"),
            record("", "garbage"),
        ];

        let index = aggregate(&records, &UserFilter::empty()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.records_seen, 3);
        assert_eq!(index.records_counted, 0);
    }

    #[test]
    fn test_skipped_user_timestamp_not_checked() {
        let records = vec![record("system", "not a date")];
        assert!(aggregate(&records, &UserFilter::default()).is_ok());
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let records = vec![
            record("alice", "2025-07-20 01:00:00"),
            record("Bob", "bad-ts"),
            record("carol", "2025-07-21 01:00:00"),
        ];

        let err = aggregate(&records, &UserFilter::default()).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.user, "bob");
        assert_eq!(
            err.source,
            FormatError::UnexpectedFormat("bad-ts".to_string())
        );
    }

    #[test]
    fn test_missing_timestamp_is_fatal() {
        let records = vec![RawRecord::new(Some("alice"), None)];

        let err = aggregate(&records, &UserFilter::default()).unwrap_err();
        assert_eq!(err.source, FormatError::MissingTimestamp);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<RawRecord> = Vec::new();
        let index = aggregate(&records, &UserFilter::default()).unwrap();
        assert_eq!(index, LoginIndex::default());
    }
}
