//! Deletion report model.

use serde::{Deserialize, Serialize};

/// Rows removed by one cascading deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReport {
    /// Entity kind of the deleted parent (`"team"`, `"user"`, ...)
    pub entity: String,
    pub id: i64,
    pub registrations: u64,
    pub join_requests: u64,
    pub memberships: u64,
    pub leaderboard_rows: u64,
}

impl DeletionReport {
    pub(crate) fn new(entity: &str, id: i64) -> Self {
        Self {
            entity: entity.to_string(),
            id,
            ..Self::default()
        }
    }

    /// Dependent rows removed before the parent
    pub fn dependents(&self) -> u64 {
        self.registrations + self.join_requests + self.memberships + self.leaderboard_rows
    }
}
