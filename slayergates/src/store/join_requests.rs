//! Team join request rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{JoinRequestId, JoinRequestStatus, TeamId, TeamJoinRequest, UserId},
};

const REQUEST_COLUMNS: &str = "id, team_id, user_id, status, created_at, updated_at";

fn map_request(row: &SqliteRow) -> CoreResult<TeamJoinRequest> {
    Ok(TeamJoinRequest {
        id: row.get("id"),
        team_id: row.get("team_id"),
        user_id: row.get("user_id"),
        status: row.get::<String, _>("status").parse::<JoinRequestStatus>()?,
        created_at: timestamp(row, "created_at"),
        updated_at: timestamp(row, "updated_at"),
    })
}

/// Insert a new PENDING request
pub async fn insert(
    conn: &mut SqliteConnection,
    team_id: TeamId,
    user_id: UserId,
    created_at: DateTime<Utc>,
) -> CoreResult<TeamJoinRequest> {
    let row = sqlx::query(&format!(
        "INSERT INTO team_join_requests (team_id, user_id, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $4) RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(team_id)
    .bind(user_id)
    .bind(JoinRequestStatus::Pending.as_str())
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    map_request(&row)
}

pub async fn find(
    conn: &mut SqliteConnection,
    id: JoinRequestId,
) -> CoreResult<Option<TeamJoinRequest>> {
    let row = sqlx::query(&format!(
        "SELECT {REQUEST_COLUMNS} FROM team_join_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(map_request).transpose()
}

/// The pending request of a user for a team, if any
pub async fn find_pending(
    conn: &mut SqliteConnection,
    team_id: TeamId,
    user_id: UserId,
) -> CoreResult<Option<TeamJoinRequest>> {
    let row = sqlx::query(&format!(
        "SELECT {REQUEST_COLUMNS} FROM team_join_requests \
         WHERE team_id = $1 AND user_id = $2 AND status = 'PENDING' LIMIT 1"
    ))
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(map_request).transpose()
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: JoinRequestId,
    status: JoinRequestStatus,
    updated_at: DateTime<Utc>,
) -> CoreResult<u64> {
    let result =
        sqlx::query("UPDATE team_join_requests SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(naive(updated_at))
            .bind(id)
            .execute(&mut *conn)
            .await?;

    Ok(result.rows_affected())
}

pub async fn count_pending(conn: &mut SqliteConnection, team_id: TeamId) -> CoreResult<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS n FROM team_join_requests WHERE team_id = $1 AND status = 'PENDING'",
    )
    .bind(team_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.get("n"))
}

pub async fn delete_for_team(conn: &mut SqliteConnection, team_id: TeamId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM team_join_requests WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_for_user(conn: &mut SqliteConnection, user_id: UserId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM team_join_requests WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
