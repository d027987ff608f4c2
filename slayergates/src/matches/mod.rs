//! Match lifecycle module.
//!
//! Owns the match state machine:
//!
//! ```text
//! PENDING ──▶ IN_PROGRESS ──▶ COMPLETED
//!    │             │
//!    └──────┬──────┘
//!           ▼
//!       CANCELLED
//! ```
//!
//! Transitions are permissive unless the engine is built with
//! [`MatchEngine::with_strict_transitions`]. Score and winner validation and
//! completion timestamps live here too.

pub mod engine;
pub mod models;

pub use engine::MatchEngine;
pub use models::{
    DEFAULT_HISTORY_LIMIT, MatchHistoryEntry, Score, UNDECIDED_WINNER, UNKNOWN_WINNER,
    winner_name,
};
