//! # SlayerGates
//!
//! Tournament, roster and match-lifecycle engine for a school e-sports league.
//!
//! The crate keeps registrations, team membership and match outcomes
//! consistent while entities are created, advanced through their states and
//! deleted. Integrity rules that a database-level cascade would normally hide
//! are explicit here: ordered deletions, capacity accounting, participant
//! checks on match results.
//!
//! ## Architecture
//!
//! Managers sit on top of a thin [`store`] layer over SQLite:
//!
//! - [`catalog`]: schools, teams and tournaments
//! - [`roster`]: registrations, seat accounting, memberships, join requests
//! - [`matches`]: match state machine, scores and winners
//! - [`cascade`]: dependency-ordered deletion
//! - [`stats`]: growth curves, grouped counts, leaderboard
//! - [`auth`]: admin password policy, hashing, accounts
//!
//! Every mutating operation runs in its own transaction.
//!
//! ## Example
//!
//! ```no_run
//! use slayergates::{db::Database, matches::MatchEngine, roster::RosterManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), slayergates::CoreError> {
//!     let db = Database::in_memory().await?;
//!     let roster = RosterManager::new(db.pool());
//!     let engine = MatchEngine::new(db.pool()).with_strict_transitions(true);
//!
//!     let slots = roster.compute_slots(1).await?;
//!     println!("{} seat(s) left", slots.available_count);
//!
//!     let game = engine.update_score(1, "16-14", Some(3)).await?;
//!     println!("match {} is {}", game.id, game.status);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cascade;
pub mod catalog;
pub mod db;
pub mod errors;
pub mod matches;
pub mod models;
pub mod roster;
pub mod stats;
pub mod store;

pub use errors::{CoreError, CoreResult, ErrorKind};
pub use models::{
    JoinRequestStatus, LeaderboardEntry, Match, MatchStatus, NewTeam, NewTournament, Role,
    School, Team, TeamJoinRequest, TeamMembership, Tournament, TournamentRegistration, User,
};
