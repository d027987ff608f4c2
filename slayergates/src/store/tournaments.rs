//! Tournament rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, optional_timestamp, timestamp};
use crate::{
    errors::CoreResult,
    models::{NewTournament, Tournament, TournamentId},
};

const TOURNAMENT_COLUMNS: &str = "id, title, game, description, format, max_capacity, is_online, \
     location, start_time, end_time, status, players_per_team, creator_id, created_at";

pub(crate) fn map_tournament(row: &SqliteRow) -> Tournament {
    Tournament {
        id: row.get("id"),
        title: row.get("title"),
        game: row.get("game"),
        description: row.get("description"),
        format: row.get("format"),
        max_capacity: row.get("max_capacity"),
        is_online: row.get("is_online"),
        location: row.get("location"),
        start_time: timestamp(row, "start_time"),
        end_time: optional_timestamp(row, "end_time"),
        status: row.get("status"),
        players_per_team: row.get("players_per_team"),
        creator_id: row.get("creator_id"),
        created_at: timestamp(row, "created_at"),
    }
}

pub async fn insert(
    conn: &mut SqliteConnection,
    tournament: &NewTournament,
    status: &str,
    created_at: DateTime<Utc>,
) -> CoreResult<Tournament> {
    let row = sqlx::query(&format!(
        "INSERT INTO tournaments (title, game, description, format, max_capacity, is_online, \
         location, start_time, end_time, status, players_per_team, creator_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {TOURNAMENT_COLUMNS}"
    ))
    .bind(&tournament.title)
    .bind(&tournament.game)
    .bind(&tournament.description)
    .bind(&tournament.format)
    .bind(tournament.max_capacity)
    .bind(tournament.is_online)
    .bind(&tournament.location)
    .bind(naive(tournament.start_time))
    .bind(tournament.end_time.map(naive))
    .bind(status)
    .bind(tournament.players_per_team)
    .bind(tournament.creator_id)
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_tournament(&row))
}

pub async fn find(conn: &mut SqliteConnection, id: TournamentId) -> CoreResult<Option<Tournament>> {
    let row = sqlx::query(&format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(map_tournament))
}

/// All tournaments, latest start first
pub async fn list(conn: &mut SqliteConnection) -> CoreResult<Vec<Tournament>> {
    let rows = sqlx::query(&format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY start_time DESC, id DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(map_tournament).collect())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: TournamentId,
    status: &str,
) -> CoreResult<u64> {
    let result = sqlx::query("UPDATE tournaments SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: TournamentId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
