//! Leaderboard rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};

use super::{naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{LeaderboardEntry, TeamId},
};

/// Insert or replace the standing of one team
pub async fn upsert(
    conn: &mut SqliteConnection,
    team_id: TeamId,
    points: i64,
    wins: i64,
    losses: i64,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO leaderboard (team_id, points, wins, losses, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        ON CONFLICT (team_id) DO UPDATE SET
            points = excluded.points,
            wins = excluded.wins,
            losses = excluded.losses,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(team_id)
    .bind(points)
    .bind(wins)
    .bind(losses)
    .bind(naive(now))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Zero every standing ahead of a rebuild
pub async fn reset_all(conn: &mut SqliteConnection, now: DateTime<Utc>) -> CoreResult<u64> {
    let result = sqlx::query(
        "UPDATE leaderboard SET points = 0, wins = 0, losses = 0, updated_at = $1",
    )
    .bind(naive(now))
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Standings with team names, best first
pub async fn list(conn: &mut SqliteConnection) -> CoreResult<Vec<LeaderboardEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT l.team_id, t.name AS team_name, l.points, l.wins, l.losses, l.updated_at
        FROM leaderboard l
        JOIN teams t ON t.id = l.team_id
        ORDER BY l.points DESC, l.wins DESC, t.name ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| LeaderboardEntry {
            team_id: row.get("team_id"),
            team_name: row.get("team_name"),
            points: row.get("points"),
            wins: row.get("wins"),
            losses: row.get("losses"),
            updated_at: timestamp(row, "updated_at"),
        })
        .collect())
}

pub async fn delete_for_team(conn: &mut SqliteConnection, team_id: TeamId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM leaderboard WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
