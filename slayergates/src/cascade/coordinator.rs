//! Deletion coordinator implementation.

use sqlx::SqlitePool;
use std::sync::Arc;

use super::models::DeletionReport;
use crate::{
    errors::{CoreError, CoreResult},
    models::{SchoolId, TeamId, TournamentId, UserId},
    store,
};

/// Cascading deletion coordinator
#[derive(Clone)]
pub struct DeletionCoordinator {
    pool: Arc<SqlitePool>,
}

/// Turn a foreign-key refusal of the parent delete into a conflict
fn parent_delete(result: CoreResult<u64>, entity: &str, id: i64) -> CoreResult<u64> {
    result.map_err(|err| {
        if err.is_foreign_key_violation() {
            log::warn!("{} {} is still referenced, deletion rolled back", entity, id);
            CoreError::conflict(format!("{entity} {id} is still referenced by other records"))
        } else {
            err
        }
    })
}

impl DeletionCoordinator {
    /// Create a new deletion coordinator
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Delete a team and everything that hangs off it
    ///
    /// Order: registrations, join requests, memberships, leaderboard row,
    /// team.
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Team does not exist
    /// * `CoreError::Conflict` - Team is still referenced by matches; nothing
    ///   is removed
    pub async fn delete_team(&self, team_id: TeamId) -> CoreResult<DeletionReport> {
        let mut tx = self.pool.begin().await?;

        if store::teams::find(&mut *tx, team_id).await?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }

        let mut report = DeletionReport::new("team", team_id);
        report.registrations = store::registrations::delete_for_team(&mut *tx, team_id).await?;
        report.join_requests = store::join_requests::delete_for_team(&mut *tx, team_id).await?;
        report.memberships = store::memberships::delete_for_team(&mut *tx, team_id).await?;
        report.leaderboard_rows = store::leaderboard::delete_for_team(&mut *tx, team_id).await?;

        parent_delete(store::teams::delete(&mut *tx, team_id).await, "Team", team_id)?;
        tx.commit().await?;

        log::info!(
            "Deleted team {} with {} dependent row(s)",
            team_id,
            report.dependents()
        );
        Ok(report)
    }

    /// Delete a user after their join requests and memberships
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - User does not exist
    /// * `CoreError::Conflict` - User captains a team or created a tournament
    pub async fn delete_user(&self, user_id: UserId) -> CoreResult<DeletionReport> {
        let mut tx = self.pool.begin().await?;

        if store::users::find(&mut *tx, user_id).await?.is_none() {
            return Err(CoreError::not_found("User", user_id));
        }

        let mut report = DeletionReport::new("user", user_id);
        report.join_requests = store::join_requests::delete_for_user(&mut *tx, user_id).await?;
        report.memberships = store::memberships::delete_for_user(&mut *tx, user_id).await?;

        parent_delete(store::users::delete(&mut *tx, user_id).await, "User", user_id)?;
        tx.commit().await?;

        log::info!(
            "Deleted user {} with {} dependent row(s)",
            user_id,
            report.dependents()
        );
        Ok(report)
    }

    /// Delete a school that owns no team
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - School does not exist
    /// * `CoreError::Conflict` - School still owns teams
    pub async fn delete_school(&self, school_id: SchoolId) -> CoreResult<DeletionReport> {
        let mut tx = self.pool.begin().await?;

        if store::schools::find(&mut *tx, school_id).await?.is_none() {
            return Err(CoreError::not_found("School", school_id));
        }

        let teams = store::schools::team_count(&mut *tx, school_id).await?;
        if teams > 0 {
            log::warn!("Refused to delete school {} owning {} team(s)", school_id, teams);
            return Err(CoreError::conflict(format!(
                "school {school_id} still has {teams} team(s)"
            )));
        }

        parent_delete(
            store::schools::delete(&mut *tx, school_id).await,
            "School",
            school_id,
        )?;
        tx.commit().await?;

        log::info!("Deleted school {}", school_id);
        Ok(DeletionReport::new("school", school_id))
    }

    /// Delete a tournament after its registrations
    ///
    /// Matches of the tournament are kept.
    pub async fn delete_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> CoreResult<DeletionReport> {
        let mut tx = self.pool.begin().await?;

        if store::tournaments::find(&mut *tx, tournament_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("Tournament", tournament_id));
        }

        let mut report = DeletionReport::new("tournament", tournament_id);
        report.registrations =
            store::registrations::delete_for_tournament(&mut *tx, tournament_id).await?;

        parent_delete(
            store::tournaments::delete(&mut *tx, tournament_id).await,
            "Tournament",
            tournament_id,
        )?;
        tx.commit().await?;

        log::info!(
            "Deleted tournament {} and {} registration(s)",
            tournament_id,
            report.registrations
        );
        Ok(report)
    }
}
