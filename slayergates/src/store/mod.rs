//! Entity store: a thin query/command layer over the relational schema.
//!
//! Every function takes a `&mut SqliteConnection` so that managers can run
//! several of them inside one transaction (`&mut *tx`) or on a plain pooled
//! connection. Nothing here enforces business rules; existence checks,
//! ordering of deletes and validation live in the managers.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

pub mod join_requests;
pub mod leaderboard;
pub mod matches;
pub mod memberships;
pub mod registrations;
pub mod schools;
pub mod teams;
pub mod tournaments;
pub mod users;

/// Read a non-null timestamp column
pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> DateTime<Utc> {
    row.get::<NaiveDateTime, _>(column).and_utc()
}

/// Read a nullable timestamp column
pub(crate) fn optional_timestamp(row: &SqliteRow, column: &str) -> Option<DateTime<Utc>> {
    row.get::<Option<NaiveDateTime>, _>(column)
        .map(|dt| dt.and_utc())
}

/// Convert a timestamp to its stored form
pub(crate) fn naive(at: DateTime<Utc>) -> NaiveDateTime {
    at.naive_utc()
}

/// Read a `(label, count)` pair produced by a grouped query
pub(crate) fn label_count(row: &SqliteRow) -> (String, i64) {
    (row.get("label"), row.get("count"))
}
