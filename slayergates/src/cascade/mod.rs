//! Cascading deletion module.
//!
//! The schema carries no `ON DELETE CASCADE`; dependent rows are removed here
//! in dependency order inside a single transaction per call. If the final
//! parent delete is refused by a foreign key (a team that still has matches,
//! a user who captains a team), the whole call is rolled back and reported as
//! a conflict.

pub mod coordinator;
pub mod models;

pub use coordinator::DeletionCoordinator;
pub use models::DeletionReport;
