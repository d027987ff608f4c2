//! Tournament registration rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{label_count, naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{TeamId, TournamentId, TournamentRegistration, UserId},
};

const REGISTRATION_COLUMNS: &str = "tournament_id, team_id, registered_at, participating_players";

/// Distinct players registered to one tournament, read in bulk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCount {
    pub tournament_id: TournamentId,
    pub title: String,
    pub max_capacity: i64,
    pub registered: i64,
}

fn map_registration(row: &SqliteRow) -> CoreResult<TournamentRegistration> {
    let players = row
        .get::<Option<String>, _>("participating_players")
        .map(|raw| serde_json::from_str::<Vec<UserId>>(&raw))
        .transpose()?;

    Ok(TournamentRegistration {
        tournament_id: row.get("tournament_id"),
        team_id: row.get("team_id"),
        registered_at: timestamp(row, "registered_at"),
        participating_players: players,
    })
}

pub async fn insert(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    team_id: TeamId,
    registered_at: DateTime<Utc>,
) -> CoreResult<TournamentRegistration> {
    let row = sqlx::query(&format!(
        "INSERT INTO tournament_registrations (tournament_id, team_id, registered_at) \
         VALUES ($1, $2, $3) RETURNING {REGISTRATION_COLUMNS}"
    ))
    .bind(tournament_id)
    .bind(team_id)
    .bind(naive(registered_at))
    .fetch_one(&mut *conn)
    .await?;

    map_registration(&row)
}

pub async fn find(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    team_id: TeamId,
) -> CoreResult<Option<TournamentRegistration>> {
    let row = sqlx::query(&format!(
        "SELECT {REGISTRATION_COLUMNS} FROM tournament_registrations \
         WHERE tournament_id = $1 AND team_id = $2"
    ))
    .bind(tournament_id)
    .bind(team_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(map_registration).transpose()
}

/// Registrations, optionally for a single tournament, most recent first
pub async fn list(
    conn: &mut SqliteConnection,
    tournament_id: Option<TournamentId>,
) -> CoreResult<Vec<TournamentRegistration>> {
    let rows = sqlx::query(&format!(
        "SELECT {REGISTRATION_COLUMNS} FROM tournament_registrations \
         WHERE $1 IS NULL OR tournament_id = $1 \
         ORDER BY registered_at DESC, rowid DESC"
    ))
    .bind(tournament_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(map_registration).collect()
}

pub async fn set_participating_players(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    team_id: TeamId,
    players: &[UserId],
) -> CoreResult<u64> {
    let encoded = serde_json::to_string(players)?;

    let result = sqlx::query(
        "UPDATE tournament_registrations SET participating_players = $1 \
         WHERE tournament_id = $2 AND team_id = $3",
    )
    .bind(encoded)
    .bind(tournament_id)
    .bind(team_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Distinct users on the rosters of every team registered to a tournament
pub async fn distinct_player_count(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> CoreResult<i64> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(DISTINCT tm.user_id) AS n
        FROM tournament_registrations r
        JOIN team_members tm ON tm.team_id = r.team_id
        WHERE r.tournament_id = $1
        "#,
    )
    .bind(tournament_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.get("n"))
}

/// [`distinct_player_count`] for every tournament, latest start first
pub async fn player_counts(conn: &mut SqliteConnection) -> CoreResult<Vec<PlayerCount>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.title, t.max_capacity, COUNT(DISTINCT tm.user_id) AS registered
        FROM tournaments t
        LEFT JOIN tournament_registrations r ON r.tournament_id = t.id
        LEFT JOIN team_members tm ON tm.team_id = r.team_id
        GROUP BY t.id, t.title, t.max_capacity
        ORDER BY t.start_time DESC, t.id DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| PlayerCount {
            tournament_id: row.get("id"),
            title: row.get("title"),
            max_capacity: row.get("max_capacity"),
            registered: row.get("registered"),
        })
        .collect())
}

/// Registration counts grouped by the registered team's school
pub async fn count_per_school(conn: &mut SqliteConnection) -> CoreResult<Vec<(String, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT s.name AS label, COUNT(*) AS count
        FROM tournament_registrations r
        JOIN teams t ON t.id = r.team_id
        JOIN schools s ON s.id = t.school_id
        GROUP BY s.id, s.name
        ORDER BY count DESC, label ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(label_count).collect())
}

pub async fn delete(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
    team_id: TeamId,
) -> CoreResult<u64> {
    let result = sqlx::query(
        "DELETE FROM tournament_registrations WHERE tournament_id = $1 AND team_id = $2",
    )
    .bind(tournament_id)
    .bind(team_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_for_team(conn: &mut SqliteConnection, team_id: TeamId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM tournament_registrations WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_for_tournament(
    conn: &mut SqliteConnection,
    tournament_id: TournamentId,
) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM tournament_registrations WHERE tournament_id = $1")
        .bind(tournament_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
