//! Match lifecycle data models.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{CoreError, CoreResult},
    models::Match,
};

/// Default length of [`MatchEngine::match_history`](super::MatchEngine::match_history)
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Winner label when the recorded winner is neither side
pub const UNKNOWN_WINNER: &str = "unknown";

/// Winner label when no winner was recorded
pub const UNDECIDED_WINNER: &str = "undefined";

/// Completed match annotated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    #[serde(flatten)]
    pub game: Match,
    pub team1_name: String,
    pub team2_name: String,
    pub winner_name: String,
}

/// Parsed `"<int>-<int>"` score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team1: u32,
    pub team2: u32,
}

impl Score {
    /// Parse a score string such as `"16-14"`
    ///
    /// Surrounding whitespace is ignored on both sides of the dash.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let malformed = || CoreError::invalid(format!("score must look like '16-14', got '{raw}'"));

        let (left, right) = raw.trim().split_once('-').ok_or_else(malformed)?;
        let team1 = parse_points(left).ok_or_else(malformed)?;
        let team2 = parse_points(right).ok_or_else(malformed)?;

        Ok(Self { team1, team2 })
    }
}

/// One side of a score: ASCII digits only, no sign
fn parse_points(side: &str) -> Option<u32> {
    let side = side.trim();
    if side.is_empty() || !side.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    side.parse().ok()
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.team1, self.team2)
    }
}

/// Display name of a match winner
pub fn winner_name(game: &Match, team1_name: &str, team2_name: &str) -> String {
    match game.winner_id {
        None => UNDECIDED_WINNER.to_string(),
        Some(id) if id == game.team1_id => team1_name.to_string(),
        Some(id) if id == game.team2_id => team2_name.to_string(),
        Some(_) => UNKNOWN_WINNER.to_string(),
    }
}
