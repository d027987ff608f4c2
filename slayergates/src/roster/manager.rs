//! Roster manager implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::models::{MEMBER_ROLE, TournamentSlots};
use crate::{
    errors::{CoreError, CoreResult},
    models::{
        JoinRequestId, JoinRequestStatus, MembershipId, TeamId, TeamJoinRequest, TeamMembership,
        TournamentId, TournamentRegistration, UserId,
    },
    store,
};

/// Roster and registration manager
#[derive(Clone)]
pub struct RosterManager {
    pool: Arc<SqlitePool>,
    enforce_capacity: bool,
}

impl RosterManager {
    /// Create a new roster manager
    ///
    /// Capacity is informational only until
    /// [`with_capacity_enforcement`](Self::with_capacity_enforcement) is set.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            pool,
            enforce_capacity: false,
        }
    }

    /// Reject registrations once a tournament has no seats left
    pub fn with_capacity_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    /// Register a team to a tournament
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    /// * `team_id` - Team ID
    ///
    /// # Returns
    ///
    /// * `CoreResult<TournamentRegistration>` - New registration
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Tournament or team does not exist
    /// * `CoreError::Conflict` - Team already registered, or the tournament is
    ///   full while capacity is enforced
    pub async fn register_team(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> CoreResult<TournamentRegistration> {
        let mut tx = self.pool.begin().await?;

        let tournament = store::tournaments::find(&mut *tx, tournament_id)
            .await?
            .ok_or(CoreError::not_found("Tournament", tournament_id))?;

        if store::teams::find(&mut *tx, team_id).await?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }

        if store::registrations::find(&mut *tx, tournament_id, team_id)
            .await?
            .is_some()
        {
            log::warn!(
                "Team {} is already registered to tournament {}",
                team_id,
                tournament_id
            );
            return Err(CoreError::conflict(format!(
                "team {team_id} is already registered to tournament {tournament_id}"
            )));
        }

        if self.enforce_capacity {
            let registered =
                store::registrations::distinct_player_count(&mut *tx, tournament_id).await?;
            let slots = TournamentSlots::new(
                tournament.id,
                tournament.title,
                tournament.max_capacity,
                registered,
            );
            if slots.is_full() {
                log::warn!("Tournament {} is full, rejecting team {}", tournament_id, team_id);
                return Err(CoreError::conflict(format!(
                    "tournament {tournament_id} is full"
                )));
            }
        }

        let registration =
            store::registrations::insert(&mut *tx, tournament_id, team_id, Utc::now()).await?;
        tx.commit().await?;

        log::info!("Registered team {} to tournament {}", team_id, tournament_id);
        Ok(registration)
    }

    /// Compute the seat accounting of a tournament
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Tournament does not exist
    pub async fn compute_slots(&self, tournament_id: TournamentId) -> CoreResult<TournamentSlots> {
        let mut conn = self.pool.acquire().await?;

        let tournament = store::tournaments::find(&mut *conn, tournament_id)
            .await?
            .ok_or(CoreError::not_found("Tournament", tournament_id))?;
        let registered =
            store::registrations::distinct_player_count(&mut *conn, tournament_id).await?;

        Ok(TournamentSlots::new(
            tournament.id,
            tournament.title,
            tournament.max_capacity,
            registered,
        ))
    }

    /// Seat accounting for every tournament, latest start first
    pub async fn all_slots(&self) -> CoreResult<Vec<TournamentSlots>> {
        let mut conn = self.pool.acquire().await?;
        let counts = store::registrations::player_counts(&mut *conn).await?;

        Ok(counts
            .into_iter()
            .map(|c| TournamentSlots::new(c.tournament_id, c.title, c.max_capacity, c.registered))
            .collect())
    }

    /// Registrations, optionally for one tournament, most recent first
    pub async fn list_registrations(
        &self,
        tournament_id: Option<TournamentId>,
    ) -> CoreResult<Vec<TournamentRegistration>> {
        let mut conn = self.pool.acquire().await?;
        store::registrations::list(&mut *conn, tournament_id).await
    }

    /// Put a user on a team's roster
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Empty role label
    /// * `CoreError::NotFound` - Team or user does not exist
    pub async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: &str,
    ) -> CoreResult<TeamMembership> {
        let role = role.trim();
        if role.is_empty() {
            return Err(CoreError::invalid("membership role must not be empty"));
        }

        let mut tx = self.pool.begin().await?;
        Self::ensure_team_and_user(&mut tx, team_id, user_id).await?;

        let membership =
            store::memberships::insert(&mut *tx, team_id, user_id, role, Utc::now()).await?;
        tx.commit().await?;

        log::info!("Added user {} to team {} as '{}'", user_id, team_id, role);
        Ok(membership)
    }

    pub async fn remove_member(&self, membership_id: MembershipId) -> CoreResult<()> {
        let mut conn = self.pool.acquire().await?;

        if store::memberships::delete(&mut *conn, membership_id).await? == 0 {
            return Err(CoreError::not_found("Membership", membership_id));
        }

        log::info!("Removed membership {}", membership_id);
        Ok(())
    }

    /// Roster of a team, in joining order
    pub async fn team_members(&self, team_id: TeamId) -> CoreResult<Vec<TeamMembership>> {
        let mut conn = self.pool.acquire().await?;

        if store::teams::find(&mut *conn, team_id).await?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }
        store::memberships::list_for_team(&mut *conn, team_id).await
    }

    /// File a pending request for a user to join a team
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Team or user does not exist
    /// * `CoreError::Conflict` - A request for this pair is already pending
    pub async fn request_to_join(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> CoreResult<TeamJoinRequest> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_team_and_user(&mut tx, team_id, user_id).await?;

        if store::join_requests::find_pending(&mut *tx, team_id, user_id)
            .await?
            .is_some()
        {
            return Err(CoreError::conflict(format!(
                "user {user_id} already has a pending request for team {team_id}"
            )));
        }

        let request = store::join_requests::insert(&mut *tx, team_id, user_id, Utc::now()).await?;
        tx.commit().await?;

        log::info!(
            "User {} requested to join team {} (request {})",
            user_id,
            team_id,
            request.id
        );
        Ok(request)
    }

    /// Accept a pending request and admit the user as a member
    ///
    /// The status change and the new membership commit together.
    pub async fn accept_join_request(
        &self,
        request_id: JoinRequestId,
    ) -> CoreResult<TeamMembership> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let request = Self::pending_request(&mut tx, request_id).await?;
        store::join_requests::set_status(&mut *tx, request_id, JoinRequestStatus::Accepted, now)
            .await?;
        let membership =
            store::memberships::insert(&mut *tx, request.team_id, request.user_id, MEMBER_ROLE, now)
                .await?;

        tx.commit().await?;

        log::info!(
            "Accepted join request {}: user {} joined team {}",
            request_id,
            request.user_id,
            request.team_id
        );
        Ok(membership)
    }

    /// Reject a pending request
    pub async fn reject_join_request(
        &self,
        request_id: JoinRequestId,
    ) -> CoreResult<TeamJoinRequest> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let request = Self::pending_request(&mut tx, request_id).await?;
        store::join_requests::set_status(&mut *tx, request_id, JoinRequestStatus::Rejected, now)
            .await?;

        tx.commit().await?;

        log::info!("Rejected join request {}", request_id);
        Ok(TeamJoinRequest {
            status: JoinRequestStatus::Rejected,
            updated_at: now,
            ..request
        })
    }

    /// Number of pending requests for a team
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Team does not exist
    pub async fn pending_join_requests(&self, team_id: TeamId) -> CoreResult<i64> {
        let mut conn = self.pool.acquire().await?;

        if store::teams::find(&mut *conn, team_id).await?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }
        store::join_requests::count_pending(&mut *conn, team_id).await
    }

    /// Choose which rostered players take part for a registered team
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    /// * `team_id` - Registered team ID
    /// * `players` - User IDs; duplicates are dropped, order is kept
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - The team is not registered to the tournament
    /// * `CoreError::InvalidArgument` - A player is not on the team's roster
    pub async fn set_participating_players(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
        players: &[UserId],
    ) -> CoreResult<TournamentRegistration> {
        let mut tx = self.pool.begin().await?;

        if store::registrations::find(&mut *tx, tournament_id, team_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("Registration", team_id));
        }

        let roster: Vec<UserId> = store::memberships::list_for_team(&mut *tx, team_id)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect();

        let mut selected: Vec<UserId> = Vec::with_capacity(players.len());
        for &player in players {
            if !roster.contains(&player) {
                return Err(CoreError::invalid(format!(
                    "user {player} is not a member of team {team_id}"
                )));
            }
            if !selected.contains(&player) {
                selected.push(player);
            }
        }

        store::registrations::set_participating_players(&mut *tx, tournament_id, team_id, &selected)
            .await?;
        let registration = store::registrations::find(&mut *tx, tournament_id, team_id)
            .await?
            .ok_or(CoreError::not_found("Registration", team_id))?;

        tx.commit().await?;

        log::info!(
            "Team {} fields {} player(s) in tournament {}",
            team_id,
            selected.len(),
            tournament_id
        );
        Ok(registration)
    }

    async fn ensure_team_and_user(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        team_id: TeamId,
        user_id: UserId,
    ) -> CoreResult<()> {
        if store::teams::find(&mut **tx, team_id).await?.is_none() {
            return Err(CoreError::not_found("Team", team_id));
        }
        if store::users::find(&mut **tx, user_id).await?.is_none() {
            return Err(CoreError::not_found("User", user_id));
        }
        Ok(())
    }

    async fn pending_request(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        request_id: JoinRequestId,
    ) -> CoreResult<TeamJoinRequest> {
        let request = store::join_requests::find(&mut **tx, request_id)
            .await?
            .ok_or(CoreError::not_found("Join request", request_id))?;

        if request.status != JoinRequestStatus::Pending {
            return Err(CoreError::conflict(format!(
                "join request {request_id} is already {}",
                request.status
            )));
        }
        Ok(request)
    }
}
