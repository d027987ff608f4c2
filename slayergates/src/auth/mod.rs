//! Accounts module: admin credential policy, password hashing, account
//! creation and credential checks.
//!
//! ## Example
//!
//! ```no_run
//! use slayergates::auth::{AccountManager, Argon2Hasher};
//! use slayergates::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::in_memory().await?;
//!     let accounts = AccountManager::new(
//!         db.pool(),
//!         Arc::new(Argon2Hasher::new("a-long-server-side-pepper")),
//!     );
//!
//!     let admin = accounts
//!         .create_admin("root_ops", "ops@example.org", "Xq7#Lm2!Rt9$")
//!         .await?;
//!     println!("Created admin {}", admin.handle);
//!     Ok(())
//! }
//! ```

pub mod hasher;
pub mod manager;
pub mod policy;

pub use hasher::{Argon2Hasher, CredentialHasher};
pub use manager::{AccountManager, MIN_USER_PASSWORD_LEN};
pub use policy::{PolicyFailure, check_admin_password};
