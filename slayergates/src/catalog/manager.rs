//! Catalog manager implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    errors::{CoreError, CoreResult},
    models::{
        DEFAULT_TOURNAMENT_STATUS, NewTeam, NewTournament, School, Team, TeamId, Tournament,
        TournamentId,
    },
    store,
};

/// Default size of [`CatalogManager::recent_teams`]
pub const DEFAULT_RECENT_TEAMS: i64 = 10;

/// Catalog manager
#[derive(Clone)]
pub struct CatalogManager {
    pool: Arc<SqlitePool>,
}

fn required(field: &str, value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

impl CatalogManager {
    /// Create a new catalog manager
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Create a school
    ///
    /// # Arguments
    ///
    /// * `name` - Unique school name
    /// * `city` - City the school is located in
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Empty name or city
    /// * `CoreError::Conflict` - A school with this name already exists
    pub async fn create_school(&self, name: &str, city: &str) -> CoreResult<School> {
        let name = required("school name", name)?;
        let city = required("city", city)?;

        let mut tx = self.pool.begin().await?;

        if store::schools::find_by_name(&mut *tx, &name).await?.is_some() {
            log::warn!("Rejected duplicate school name '{}'", name);
            return Err(CoreError::conflict(format!(
                "a school named '{name}' already exists"
            )));
        }

        let school = store::schools::insert(&mut *tx, &name, &city, Utc::now()).await?;
        tx.commit().await?;

        log::info!("Created school {} '{}'", school.id, school.name);
        Ok(school)
    }

    /// All schools ordered by name
    pub async fn list_schools(&self) -> CoreResult<Vec<School>> {
        let mut conn = self.pool.acquire().await?;
        store::schools::list(&mut *conn).await
    }

    /// Create a team owned by a school and captained by an existing user
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Empty team name
    /// * `CoreError::NotFound` - School or captain does not exist
    pub async fn create_team(&self, team: NewTeam) -> CoreResult<Team> {
        let team = NewTeam {
            name: required("team name", &team.name)?,
            ..team
        };

        let mut tx = self.pool.begin().await?;

        if store::schools::find(&mut *tx, team.school_id).await?.is_none() {
            return Err(CoreError::not_found("School", team.school_id));
        }
        if store::users::find(&mut *tx, team.captain_id).await?.is_none() {
            return Err(CoreError::not_found("User", team.captain_id));
        }

        let team = store::teams::insert(&mut *tx, &team, Utc::now()).await?;
        tx.commit().await?;

        log::info!("Created team {} '{}'", team.id, team.name);
        Ok(team)
    }

    /// All teams ordered by name
    pub async fn list_teams(&self) -> CoreResult<Vec<Team>> {
        let mut conn = self.pool.acquire().await?;
        store::teams::list(&mut *conn).await
    }

    /// Most recently created teams, newest first
    pub async fn recent_teams(&self, limit: Option<i64>) -> CoreResult<Vec<Team>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_TEAMS).max(0);
        let mut conn = self.pool.acquire().await?;
        store::teams::recent(&mut *conn, limit).await
    }

    /// Create a tournament
    ///
    /// # Arguments
    ///
    /// * `tournament` - Tournament definition; its status starts as `PENDING`
    ///
    /// # Returns
    ///
    /// * `CoreResult<Tournament>` - Stored tournament
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Empty title/game/description, capacity
    ///   below 2, quota below 1, or an end before the start
    /// * `CoreError::NotFound` - Creator does not exist
    pub async fn create_tournament(&self, tournament: NewTournament) -> CoreResult<Tournament> {
        let tournament = NewTournament {
            title: required("title", &tournament.title)?,
            game: required("game", &tournament.game)?,
            description: required("description", &tournament.description)?,
            ..tournament
        };

        if tournament.max_capacity < 2 {
            return Err(CoreError::invalid(format!(
                "max capacity must be at least 2, got {}",
                tournament.max_capacity
            )));
        }
        if tournament.players_per_team < 1 {
            return Err(CoreError::invalid(format!(
                "players per team must be at least 1, got {}",
                tournament.players_per_team
            )));
        }
        if tournament
            .end_time
            .is_some_and(|end| end < tournament.start_time)
        {
            return Err(CoreError::invalid("end time is before start time"));
        }

        let mut tx = self.pool.begin().await?;

        if store::users::find(&mut *tx, tournament.creator_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("User", tournament.creator_id));
        }

        let tournament = store::tournaments::insert(
            &mut *tx,
            &tournament,
            DEFAULT_TOURNAMENT_STATUS,
            Utc::now(),
        )
        .await?;
        tx.commit().await?;

        log::info!(
            "Created tournament {} '{}' (capacity {})",
            tournament.id,
            tournament.title,
            tournament.max_capacity
        );
        Ok(tournament)
    }

    /// All tournaments, latest start first
    pub async fn list_tournaments(&self) -> CoreResult<Vec<Tournament>> {
        let mut conn = self.pool.acquire().await?;
        store::tournaments::list(&mut *conn).await
    }

    pub async fn get_tournament(&self, id: TournamentId) -> CoreResult<Tournament> {
        let mut conn = self.pool.acquire().await?;
        store::tournaments::find(&mut *conn, id)
            .await?
            .ok_or(CoreError::not_found("Tournament", id))
    }

    /// Replace the free-text status label of a tournament
    pub async fn set_tournament_status(
        &self,
        id: TournamentId,
        status: &str,
    ) -> CoreResult<Tournament> {
        let status = required("status", status)?;

        let mut tx = self.pool.begin().await?;

        if store::tournaments::set_status(&mut *tx, id, &status).await? == 0 {
            return Err(CoreError::not_found("Tournament", id));
        }
        let tournament = store::tournaments::find(&mut *tx, id)
            .await?
            .ok_or(CoreError::not_found("Tournament", id))?;
        tx.commit().await?;

        log::info!("Tournament {} status set to '{}'", id, status);
        Ok(tournament)
    }

    /// Remove a single registration
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - The team is not registered to the tournament
    pub async fn unregister_team(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> CoreResult<()> {
        let mut conn = self.pool.acquire().await?;

        if store::registrations::delete(&mut *conn, tournament_id, team_id).await? == 0 {
            return Err(CoreError::not_found("Registration", team_id));
        }

        log::info!(
            "Unregistered team {} from tournament {}",
            team_id,
            tournament_id
        );
        Ok(())
    }
}
