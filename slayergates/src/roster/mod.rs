//! Roster and registration module.
//!
//! Keeps team membership and tournament registrations consistent:
//! - Team registration with duplicate detection and optional capacity enforcement
//! - Seat accounting from distinct rostered players
//! - Memberships and join requests
//! - Participating player selection per registration

pub mod manager;
pub mod models;

pub use manager::RosterManager;
pub use models::{MEMBER_ROLE, TournamentSlots, available_slots};
