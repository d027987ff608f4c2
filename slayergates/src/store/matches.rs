//! Match rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, optional_timestamp, timestamp};
use crate::{
    errors::CoreResult,
    models::{Match, MatchId, MatchStatus, TeamId, TournamentId},
};

const MATCH_COLUMNS: &str = "m.id, m.tournament_id, m.team1_id, m.team2_id, m.round, m.status, \
     m.score, m.winner_id, m.scheduled_time, m.completed_time, m.created_at";

/// A completed match together with the names of both sides
#[derive(Debug, Clone)]
pub struct MatchWithTeams {
    pub game: Match,
    pub team1_name: String,
    pub team2_name: String,
}

fn map_match(row: &SqliteRow) -> CoreResult<Match> {
    Ok(Match {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        team1_id: row.get("team1_id"),
        team2_id: row.get("team2_id"),
        round: row.get("round"),
        status: row.get::<String, _>("status").parse::<MatchStatus>()?,
        score: row.get("score"),
        winner_id: row.get("winner_id"),
        scheduled_time: optional_timestamp(row, "scheduled_time"),
        completed_time: optional_timestamp(row, "completed_time"),
        created_at: timestamp(row, "created_at"),
    })
}

fn map_matches(rows: &[SqliteRow]) -> CoreResult<Vec<Match>> {
    rows.iter().map(map_match).collect()
}

pub async fn insert(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    team1_id: TeamId,
    team2_id: TeamId,
    round: i64,
    scheduled_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> CoreResult<Match> {
    let row = sqlx::query(
        r#"
        INSERT INTO matches (tournament_id, team1_id, team2_id, round, status, scheduled_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, tournament_id, team1_id, team2_id, round, status, score, winner_id,
                  scheduled_time, completed_time, created_at
        "#,
    )
    .bind(tournament_id)
    .bind(team1_id)
    .bind(team2_id)
    .bind(round)
    .bind(MatchStatus::Pending.as_str())
    .bind(scheduled_time.map(naive))
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    map_match(&row)
}

pub async fn find(conn: &mut SqliteConnection, id: MatchId) -> CoreResult<Option<Match>> {
    let row = sqlx::query(&format!("SELECT {MATCH_COLUMNS} FROM matches m WHERE m.id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(map_match).transpose()
}

/// Overwrite status and completion time
pub async fn set_status(
    conn: &mut SqliteConnection,
    id: MatchId,
    status: MatchStatus,
    completed_time: Option<DateTime<Utc>>,
) -> CoreResult<u64> {
    let result =
        sqlx::query("UPDATE matches SET status = $1, completed_time = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(completed_time.map(naive))
            .bind(id)
            .execute(&mut *conn)
            .await?;

    Ok(result.rows_affected())
}

/// Overwrite the result columns of a match
pub async fn set_result(
    conn: &mut SqliteConnection,
    id: MatchId,
    score: &str,
    status: MatchStatus,
    winner_id: Option<TeamId>,
    completed_time: Option<DateTime<Utc>>,
) -> CoreResult<u64> {
    let result = sqlx::query(
        "UPDATE matches SET score = $1, status = $2, winner_id = $3, completed_time = $4 \
         WHERE id = $5",
    )
    .bind(score)
    .bind(status.as_str())
    .bind(winner_id)
    .bind(completed_time.map(naive))
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: MatchId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Matches of a tournament ordered by round then id
pub async fn list_for_tournament(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    round: Option<i64>,
) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m \
         WHERE m.tournament_id = $1 AND ($2 IS NULL OR m.round = $2) \
         ORDER BY m.round, m.id"
    ))
    .bind(tournament_id)
    .bind(round)
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}

/// Matches a team plays in, ordered by scheduled time
pub async fn list_for_team(
    conn: &mut SqliteConnection,
    team_id: TeamId,
    status: Option<MatchStatus>,
) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m \
         WHERE (m.team1_id = $1 OR m.team2_id = $1) AND ($2 IS NULL OR m.status = $2) \
         ORDER BY m.scheduled_time, m.id"
    ))
    .bind(team_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}

/// Every match, newest first
pub async fn list_all(conn: &mut SqliteConnection) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m ORDER BY m.created_at DESC, m.id DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}

/// PENDING or IN_PROGRESS matches, ordered by scheduled time
pub async fn list_open(conn: &mut SqliteConnection) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m \
         WHERE m.status IN ('PENDING', 'IN_PROGRESS') \
         ORDER BY m.scheduled_time, m.id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}

/// COMPLETED matches with team names, latest completion first
pub async fn list_completed(
    conn: &mut SqliteConnection,
    limit: i64,
) -> CoreResult<Vec<MatchWithTeams>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS}, t1.name AS team1_name, t2.name AS team2_name \
         FROM matches m \
         JOIN teams t1 ON t1.id = m.team1_id \
         JOIN teams t2 ON t2.id = m.team2_id \
         WHERE m.status = 'COMPLETED' \
         ORDER BY m.completed_time DESC, m.id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(MatchWithTeams {
                game: map_match(row)?,
                team1_name: row.get("team1_name"),
                team2_name: row.get("team2_name"),
            })
        })
        .collect()
}

/// COMPLETED matches that recorded a winner
pub async fn list_decided(conn: &mut SqliteConnection) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m \
         WHERE m.status = 'COMPLETED' AND m.winner_id IS NOT NULL \
         ORDER BY m.id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}

/// Matches whose tournament row no longer exists
pub async fn list_orphaned(conn: &mut SqliteConnection) -> CoreResult<Vec<Match>> {
    let rows = sqlx::query(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches m \
         LEFT JOIN tournaments t ON t.id = m.tournament_id \
         WHERE t.id IS NULL \
         ORDER BY m.id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    map_matches(&rows)
}
