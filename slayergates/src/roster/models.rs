//! Roster and registration data models.

use serde::{Deserialize, Serialize};

use crate::models::TournamentId;

/// Seat accounting for one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSlots {
    pub tournament_id: TournamentId,
    pub title: String,
    pub max_capacity: i64,
    /// Distinct players on the rosters of registered teams
    pub registered_count: i64,
    /// Remaining seats, never negative
    pub available_count: i64,
}

impl TournamentSlots {
    pub fn new(
        tournament_id: TournamentId,
        title: String,
        max_capacity: i64,
        registered_count: i64,
    ) -> Self {
        Self {
            tournament_id,
            title,
            max_capacity,
            registered_count,
            available_count: available_slots(max_capacity, registered_count),
        }
    }

    pub fn is_full(&self) -> bool {
        self.available_count == 0
    }
}

/// Seats left once `registered` players are counted against `capacity`
pub fn available_slots(capacity: i64, registered: i64) -> i64 {
    capacity.saturating_sub(registered).max(0)
}

/// Role label given to members admitted through a join request
pub const MEMBER_ROLE: &str = "member";
