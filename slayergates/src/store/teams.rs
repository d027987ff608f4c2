//! Team rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{NewTeam, Team, TeamId},
};

const TEAM_COLUMNS: &str = "id, name, school_id, captain_id, logo, description, created_at";

fn map_team(row: &SqliteRow) -> Team {
    Team {
        id: row.get("id"),
        name: row.get("name"),
        school_id: row.get("school_id"),
        captain_id: row.get("captain_id"),
        logo: row.get("logo"),
        description: row.get("description"),
        created_at: timestamp(row, "created_at"),
    }
}

pub async fn insert(
    conn: &mut SqliteConnection,
    team: &NewTeam,
    created_at: DateTime<Utc>,
) -> CoreResult<Team> {
    let row = sqlx::query(&format!(
        "INSERT INTO teams (name, school_id, captain_id, logo, description, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {TEAM_COLUMNS}"
    ))
    .bind(&team.name)
    .bind(team.school_id)
    .bind(team.captain_id)
    .bind(&team.logo)
    .bind(&team.description)
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_team(&row))
}

pub async fn find(conn: &mut SqliteConnection, id: TeamId) -> CoreResult<Option<Team>> {
    let row = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(map_team))
}

/// All teams ordered by name
pub async fn list(conn: &mut SqliteConnection) -> CoreResult<Vec<Team>> {
    let rows = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY name, id"))
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.iter().map(map_team).collect())
}

/// Most recently created teams first
pub async fn recent(conn: &mut SqliteConnection, limit: i64) -> CoreResult<Vec<Team>> {
    let rows = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(map_team).collect())
}

/// Creation timestamps of every team, oldest first
pub async fn creation_times(conn: &mut SqliteConnection) -> CoreResult<Vec<DateTime<Utc>>> {
    let rows = sqlx::query("SELECT created_at FROM teams ORDER BY created_at, id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.iter().map(|row| timestamp(row, "created_at")).collect())
}

pub async fn delete(conn: &mut SqliteConnection, id: TeamId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
