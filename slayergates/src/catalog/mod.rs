//! Catalog module: administrative creation and listing of schools, teams and
//! tournaments.
//!
//! ## Example
//!
//! ```no_run
//! use slayergates::catalog::CatalogManager;
//! use slayergates::db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::in_memory().await?;
//!     let catalog = CatalogManager::new(db.pool());
//!
//!     let school = catalog.create_school("Lycée Hoche", "Versailles").await?;
//!     println!("Created school {}", school.id);
//!
//!     Ok(())
//! }
//! ```

pub mod manager;

pub use manager::{CatalogManager, DEFAULT_RECENT_TEAMS};
