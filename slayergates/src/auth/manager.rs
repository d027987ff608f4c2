//! Account manager implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::{hasher::CredentialHasher, policy::check_admin_password};
use crate::{
    errors::{CoreError, CoreResult},
    models::{NewUser, Role, SchoolId, User},
    store,
};

/// Minimum password length for regular accounts
pub const MIN_USER_PASSWORD_LEN: usize = 8;

/// Account manager
#[derive(Clone)]
pub struct AccountManager {
    pool: Arc<SqlitePool>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountManager {
    /// Create a new account manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `hasher` - Credential hashing implementation
    pub fn new(pool: Arc<SqlitePool>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { pool, hasher }
    }

    /// Create an administrator account
    ///
    /// # Errors
    ///
    /// * `CoreError::PolicyViolation` - Password rejected by the admin policy
    /// * `CoreError::InvalidArgument` - Malformed handle or email
    /// * `CoreError::Conflict` - Handle or email already taken
    pub async fn create_admin(&self, handle: &str, email: &str, password: &str) -> CoreResult<User> {
        if let Err(failure) = check_admin_password(password) {
            log::warn!("Admin password for '{}' refused: {}", handle, failure);
            return Err(failure.into());
        }

        self.create_account(handle, email, password, Role::Admin)
            .await
    }

    /// Create a regular user account
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Malformed handle or email, or a
    ///   password shorter than 8 characters
    /// * `CoreError::Conflict` - Handle or email already taken
    pub async fn create_user(&self, handle: &str, email: &str, password: &str) -> CoreResult<User> {
        if password.chars().count() < MIN_USER_PASSWORD_LEN {
            return Err(CoreError::invalid(format!(
                "password must be at least {MIN_USER_PASSWORD_LEN} characters"
            )));
        }

        self.create_account(handle, email, password, Role::User)
            .await
    }

    /// Check a handle/password pair
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFoundByKey` - Unknown handle
    /// * `CoreError::InvalidArgument` - Wrong password
    pub async fn verify_credentials(&self, handle: &str, password: &str) -> CoreResult<User> {
        let mut conn = self.pool.acquire().await?;

        let user = store::users::find_by_handle(&mut *conn, handle.trim())
            .await?
            .ok_or_else(|| CoreError::NotFoundByKey {
                entity: "User",
                key: handle.trim().to_string(),
            })?;

        if !self.hasher.verify(password, &user.password_hash) {
            log::warn!("Credential check failed for '{}'", user.handle);
            return Err(CoreError::invalid("invalid credentials"));
        }

        Ok(user)
    }

    /// Player accounts, optionally filtered
    ///
    /// # Arguments
    ///
    /// * `search` - Case-insensitive substring of the handle or email
    /// * `school_id` - Only players on a roster of one of this school's teams
    pub async fn players(
        &self,
        search: Option<&str>,
        school_id: Option<SchoolId>,
    ) -> CoreResult<Vec<User>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let mut conn = self.pool.acquire().await?;
        store::users::search_players(&mut *conn, search, school_id).await
    }

    async fn create_account(
        &self,
        handle: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> CoreResult<User> {
        let handle = handle.trim();
        let email = email.trim();
        validate_handle(handle)?;
        validate_email(email)?;

        let mut tx = self.pool.begin().await?;

        if store::users::find_by_handle(&mut *tx, handle).await?.is_some() {
            return Err(CoreError::conflict(format!("handle '{handle}' is already taken")));
        }
        if store::users::email_taken(&mut *tx, email).await? {
            return Err(CoreError::conflict(format!("email '{email}' is already registered")));
        }

        let new_user = NewUser {
            handle: handle.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            role,
        };
        let user = store::users::insert(&mut *tx, &new_user, Utc::now()).await?;
        tx.commit().await?;

        log::info!("Created {} account {} '{}'", user.role, user.id, user.handle);
        Ok(user)
    }
}

/// Validate handle format: 3-20 letters, digits or underscores
fn validate_handle(handle: &str) -> CoreResult<()> {
    let len = handle.chars().count();
    if !(3..=20).contains(&len) {
        return Err(CoreError::invalid("handle must be 3-20 characters"));
    }

    if !handle.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(CoreError::invalid(
            "handle can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Validate email shape: `local@domain.tld` without whitespace
fn validate_email(email: &str) -> CoreResult<()> {
    let invalid = || CoreError::invalid(format!("invalid email address '{email}'"));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.ends_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_handle() {
        assert!(validate_handle("neo_42").is_ok());
        assert!(validate_handle("ab").is_err());
        assert!(validate_handle("has space").is_err());
        assert!(validate_handle(&"x".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("coach@school.fr").is_ok());
        assert!(validate_email("a.b@mail.example.org").is_ok());
        for bad in ["", "no-at.fr", "@school.fr", "coach@", "coach@school", "a@b@c.fr", "co ach@x.fr", "coach@school."] {
            assert!(validate_email(bad).is_err(), "accepted {bad:?}");
        }
    }
}
