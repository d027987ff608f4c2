//! Statistics aggregator implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use std::{collections::BTreeMap, sync::Arc};

use super::models::{GrowthPoint, LabelCount, Standing, cumulative_by_date};
use crate::{
    errors::CoreResult,
    models::{LeaderboardEntry, Match, TeamId},
    store,
};

/// Statistics aggregator
#[derive(Clone)]
pub struct StatsAggregator {
    pool: Arc<SqlitePool>,
}

/// Tally wins and losses of every team appearing in decided matches
fn tally(matches: &[Match]) -> BTreeMap<TeamId, Standing> {
    let mut standings: BTreeMap<TeamId, Standing> = BTreeMap::new();

    for game in matches {
        let Some(winner) = game.winner_id else {
            continue;
        };
        if !game.involves(winner) {
            continue;
        }
        let loser = if winner == game.team1_id {
            game.team2_id
        } else {
            game.team1_id
        };

        standings.entry(winner).or_default().wins += 1;
        standings.entry(loser).or_default().losses += 1;
    }

    standings
}

impl StatsAggregator {
    /// Create a new statistics aggregator
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Cumulative number of users per creation date
    pub async fn user_growth(&self) -> CoreResult<Vec<GrowthPoint>> {
        let mut conn = self.pool.acquire().await?;
        let times = store::users::creation_times(&mut *conn).await?;
        Ok(cumulative_by_date(&times))
    }

    /// Cumulative number of teams per creation date
    pub async fn team_growth(&self) -> CoreResult<Vec<GrowthPoint>> {
        let mut conn = self.pool.acquire().await?;
        let times = store::teams::creation_times(&mut *conn).await?;
        Ok(cumulative_by_date(&times))
    }

    /// Roster size of every team with at least one member
    pub async fn players_per_team(&self) -> CoreResult<Vec<LabelCount>> {
        let mut conn = self.pool.acquire().await?;
        let counts = store::memberships::count_per_team(&mut *conn).await?;
        Ok(counts.into_iter().map(LabelCount::from).collect())
    }

    /// Tournament registrations grouped by the team's school
    pub async fn registrations_per_school(&self) -> CoreResult<Vec<LabelCount>> {
        let mut conn = self.pool.acquire().await?;
        let counts = store::registrations::count_per_school(&mut *conn).await?;
        Ok(counts.into_iter().map(LabelCount::from).collect())
    }

    /// Recompute the leaderboard from completed matches
    ///
    /// Rows of teams with no decided match left are kept at zero.
    ///
    /// # Returns
    ///
    /// * `CoreResult<usize>` - Number of team rows written
    pub async fn refresh_leaderboard(&self) -> CoreResult<usize> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let decided = store::matches::list_decided(&mut *tx).await?;
        let standings = tally(&decided);

        store::leaderboard::reset_all(&mut *tx, now).await?;
        for (team_id, standing) in &standings {
            store::leaderboard::upsert(
                &mut *tx,
                *team_id,
                standing.points(),
                standing.wins,
                standing.losses,
                now,
            )
            .await?;
        }
        tx.commit().await?;

        log::info!(
            "Leaderboard refreshed from {} match(es), {} team(s)",
            decided.len(),
            standings.len()
        );
        Ok(standings.len())
    }

    /// Leaderboard rows, highest points first
    pub async fn leaderboard(&self) -> CoreResult<Vec<LeaderboardEntry>> {
        let mut conn = self.pool.acquire().await?;
        store::leaderboard::list(&mut *conn).await
    }
}
