//! Match lifecycle engine implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use super::models::{DEFAULT_HISTORY_LIMIT, MatchHistoryEntry, Score, winner_name};
use crate::{
    errors::{CoreError, CoreResult},
    models::{Match, MatchId, MatchStatus, TeamId, TournamentId},
    store,
};

/// Match lifecycle engine
#[derive(Clone)]
pub struct MatchEngine {
    pool: Arc<SqlitePool>,
    strict_transitions: bool,
}

impl MatchEngine {
    /// Create a new match engine with permissive transitions
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            pool,
            strict_transitions: false,
        }
    }

    /// Only allow the edges of the lifecycle graph
    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }

    /// Schedule a match between two teams
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament the match belongs to
    /// * `team1_id` - First team
    /// * `team2_id` - Second team, distinct from the first
    /// * `round` - Round number, starting at 1
    /// * `scheduled_time` - Optional kick-off time
    ///
    /// # Returns
    ///
    /// * `CoreResult<Match>` - New match in `PENDING`
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Same team twice or round below 1
    /// * `CoreError::NotFound` - Tournament or either team does not exist
    pub async fn create_match(
        &self,
        tournament_id: TournamentId,
        team1_id: TeamId,
        team2_id: TeamId,
        round: i64,
        scheduled_time: Option<DateTime<Utc>>,
    ) -> CoreResult<Match> {
        if team1_id == team2_id {
            return Err(CoreError::invalid("a team cannot play against itself"));
        }
        if round < 1 {
            return Err(CoreError::invalid(format!(
                "round must be at least 1, got {round}"
            )));
        }

        let mut tx = self.pool.begin().await?;

        if store::tournaments::find(&mut *tx, tournament_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("Tournament", tournament_id));
        }
        for team_id in [team1_id, team2_id] {
            if store::teams::find(&mut *tx, team_id).await?.is_none() {
                return Err(CoreError::not_found("Team", team_id));
            }
        }

        let game = store::matches::insert(
            &mut *tx,
            tournament_id,
            team1_id,
            team2_id,
            round,
            scheduled_time,
            Utc::now(),
        )
        .await?;
        tx.commit().await?;

        log::info!(
            "Created match {} in tournament {}: team {} vs team {} (round {})",
            game.id,
            tournament_id,
            team1_id,
            team2_id,
            round
        );
        Ok(game)
    }

    /// Move a match to another status
    ///
    /// # Arguments
    ///
    /// * `match_id` - Match ID
    /// * `status` - Status label, case-insensitive
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidArgument` - Unknown label, or an illegal edge in
    ///   strict mode
    /// * `CoreError::NotFound` - Match does not exist
    pub async fn update_status(&self, match_id: MatchId, status: &str) -> CoreResult<Match> {
        let next: MatchStatus = status.parse()?;

        let mut tx = self.pool.begin().await?;

        let game = store::matches::find(&mut *tx, match_id)
            .await?
            .ok_or(CoreError::not_found("Match", match_id))?;

        if self.strict_transitions && !game.status.can_transition_to(next) {
            log::warn!(
                "Rejected transition of match {} from {} to {}",
                match_id,
                game.status,
                next
            );
            return Err(CoreError::invalid(format!(
                "match {match_id} cannot move from {} to {next}",
                game.status
            )));
        }

        let completed_time = stamp_completion(&game, next, Utc::now());
        store::matches::set_status(&mut *tx, match_id, next, completed_time).await?;
        tx.commit().await?;

        log::info!("Match {} moved from {} to {}", match_id, game.status, next);
        Ok(Match {
            status: next,
            completed_time,
            ..game
        })
    }

    /// Record a score and, optionally, the winner
    ///
    /// A winner completes the match. Everything is validated before the
    /// first write, so a rejected call leaves the match untouched.
    ///
    /// # Errors
    ///
    /// * `CoreError::NotFound` - Match does not exist
    /// * `CoreError::InvalidArgument` - Malformed score, a winner that is not
    ///   one of the two teams, or a winner for a cancelled match in strict mode
    pub async fn update_score(
        &self,
        match_id: MatchId,
        score: &str,
        winner_id: Option<TeamId>,
    ) -> CoreResult<Match> {
        let mut tx = self.pool.begin().await?;

        let game = store::matches::find(&mut *tx, match_id)
            .await?
            .ok_or(CoreError::not_found("Match", match_id))?;

        let score = Score::parse(score)?.to_string();

        if let Some(winner) = winner_id {
            if !game.involves(winner) {
                log::warn!(
                    "Rejected winner {} for match {} ({} vs {})",
                    winner,
                    match_id,
                    game.team1_id,
                    game.team2_id
                );
                return Err(CoreError::invalid(format!(
                    "winner {winner} is not playing in match {match_id}"
                )));
            }
            if self.strict_transitions && game.status == MatchStatus::Cancelled {
                return Err(CoreError::invalid(format!(
                    "match {match_id} was cancelled"
                )));
            }
        }

        let (status, completed_time) = match winner_id {
            // A reported winner always restamps completion
            Some(_) => (MatchStatus::Completed, Some(Utc::now())),
            None => (game.status, game.completed_time),
        };
        let winner_id = winner_id.or(game.winner_id);

        store::matches::set_result(&mut *tx, match_id, &score, status, winner_id, completed_time)
            .await?;
        tx.commit().await?;

        log::info!(
            "Match {} score {} (status {}, winner {:?})",
            match_id,
            score,
            status,
            winner_id
        );
        let updated = Match {
            status,
            score: Some(score),
            winner_id,
            completed_time,
            ..game
        };
        Ok(updated)
    }

    pub async fn delete_match(&self, match_id: MatchId) -> CoreResult<()> {
        let mut conn = self.pool.acquire().await?;

        if store::matches::delete(&mut *conn, match_id).await? == 0 {
            return Err(CoreError::not_found("Match", match_id));
        }

        log::info!("Deleted match {}", match_id);
        Ok(())
    }

    pub async fn get_match(&self, match_id: MatchId) -> CoreResult<Match> {
        let mut conn = self.pool.acquire().await?;
        store::matches::find(&mut *conn, match_id)
            .await?
            .ok_or(CoreError::not_found("Match", match_id))
    }

    /// Matches of a tournament, optionally one round, ordered by round then id
    pub async fn tournament_matches(
        &self,
        tournament_id: TournamentId,
        round: Option<i64>,
    ) -> CoreResult<Vec<Match>> {
        let mut conn = self.pool.acquire().await?;
        store::matches::list_for_tournament(&mut *conn, tournament_id, round).await
    }

    /// Matches a team plays in, optionally filtered by status
    pub async fn team_matches(
        &self,
        team_id: TeamId,
        status: Option<MatchStatus>,
    ) -> CoreResult<Vec<Match>> {
        let mut conn = self.pool.acquire().await?;
        store::matches::list_for_team(&mut *conn, team_id, status).await
    }

    /// Every match, newest first
    pub async fn all_matches(&self) -> CoreResult<Vec<Match>> {
        let mut conn = self.pool.acquire().await?;
        store::matches::list_all(&mut *conn).await
    }

    /// Matches that are pending or being played
    pub async fn current_matches(&self) -> CoreResult<Vec<Match>> {
        let mut conn = self.pool.acquire().await?;
        store::matches::list_open(&mut *conn).await
    }

    /// Completed matches, latest first, with a display name for the winner
    pub async fn match_history(&self, limit: Option<i64>) -> CoreResult<Vec<MatchHistoryEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(0);
        let mut conn = self.pool.acquire().await?;

        let rows = store::matches::list_completed(&mut *conn, limit).await?;
        log::debug!("Loaded {} completed match(es)", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| MatchHistoryEntry {
                winner_name: winner_name(&row.game, &row.team1_name, &row.team2_name),
                game: row.game,
                team1_name: row.team1_name,
                team2_name: row.team2_name,
            })
            .collect())
    }

    /// Matches left behind by a deleted tournament
    pub async fn orphaned_matches(&self) -> CoreResult<Vec<Match>> {
        let mut conn = self.pool.acquire().await?;
        store::matches::list_orphaned(&mut *conn).await
    }
}

/// Completion time after moving `game` to `next`
///
/// Entering `COMPLETED` stamps `now` unless a time is already recorded.
fn stamp_completion(
    game: &Match,
    next: MatchStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (next, game.completed_time) {
        (MatchStatus::Completed, None) => Some(now),
        (_, existing) => existing,
    }
}
