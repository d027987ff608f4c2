//! Entity models shared by the store and the managers.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub type SchoolId = i64;
pub type UserId = i64;
pub type TeamId = i64;
pub type TournamentId = i64;
pub type MatchId = i64;
pub type MembershipId = i64;
pub type JoinRequestId = i64;

/// School model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::invalid(format!("unknown role '{other}'"))),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub handle: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub handle: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Tournament model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    pub game: String,
    pub description: String,
    pub format: String,
    pub max_capacity: i64,
    pub is_online: bool,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub players_per_team: i64,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Tournament creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTournament {
    pub title: String,
    pub game: String,
    pub description: String,
    pub format: String,
    pub max_capacity: i64,
    pub is_online: bool,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub players_per_team: i64,
    pub creator_id: UserId,
}

/// Label given to freshly created tournaments
pub const DEFAULT_TOURNAMENT_STATUS: &str = "PENDING";

/// Team model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub school_id: SchoolId,
    pub captain_id: UserId,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Team creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub school_id: SchoolId,
    pub captain_id: UserId,
    pub logo: Option<String>,
    pub description: Option<String>,
}

/// Link between a user and a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: MembershipId,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Join request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "PENDING",
            JoinRequestStatus::Accepted => "ACCEPTED",
            JoinRequestStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinRequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(JoinRequestStatus::Pending),
            "ACCEPTED" => Ok(JoinRequestStatus::Accepted),
            "REJECTED" => Ok(JoinRequestStatus::Rejected),
            other => Err(CoreError::invalid(format!(
                "unknown join request status '{other}'"
            ))),
        }
    }
}

/// Request from a user to join a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamJoinRequest {
    pub id: JoinRequestId,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A team's enrollment in a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRegistration {
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    pub registered_at: DateTime<Utc>,
    pub participating_players: Option<Vec<UserId>>,
}

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Scheduled, not started
    Pending,
    /// Being played
    InProgress,
    /// Finished (terminal)
    Completed,
    /// Called off (terminal)
    Cancelled,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Pending,
        MatchStatus::InProgress,
        MatchStatus::Completed,
        MatchStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::InProgress => "IN_PROGRESS",
            MatchStatus::Completed => "COMPLETED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    /// Whether the lifecycle graph has an edge from `self` to `next`.
    ///
    /// Setting the current status again is always accepted.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        use MatchStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (*self, next),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::invalid(format!(
                    "invalid match status '{s}', must be one of: PENDING, IN_PROGRESS, COMPLETED, CANCELLED"
                ))
            })
    }
}

/// Match model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub round: i64,
    pub status: MatchStatus,
    pub score: Option<String>,
    pub winner_id: Option<TeamId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub completed_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }
}

/// Leaderboard row, one per team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team_id: TeamId,
    pub team_name: String,
    pub points: i64,
    pub wins: i64,
    pub losses: i64,
    pub updated_at: DateTime<Utc>,
}
