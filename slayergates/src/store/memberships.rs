//! Team membership rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{label_count, naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{MembershipId, TeamId, TeamMembership, UserId},
};

fn map_membership(row: &SqliteRow) -> TeamMembership {
    TeamMembership {
        id: row.get("id"),
        team_id: row.get("team_id"),
        user_id: row.get("user_id"),
        role: row.get("role"),
        joined_at: timestamp(row, "joined_at"),
    }
}

pub async fn insert(
    conn: &mut SqliteConnection,
    team_id: TeamId,
    user_id: UserId,
    role: &str,
    joined_at: DateTime<Utc>,
) -> CoreResult<TeamMembership> {
    let row = sqlx::query(
        r#"
        INSERT INTO team_members (team_id, user_id, role, joined_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, team_id, user_id, role, joined_at
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .bind(role)
    .bind(naive(joined_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_membership(&row))
}

/// Roster of a team, in joining order
pub async fn list_for_team(
    conn: &mut SqliteConnection,
    team_id: TeamId,
) -> CoreResult<Vec<TeamMembership>> {
    let rows = sqlx::query(
        "SELECT id, team_id, user_id, role, joined_at FROM team_members \
         WHERE team_id = $1 ORDER BY joined_at, id",
    )
    .bind(team_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(map_membership).collect())
}

/// Player counts per team, teams without members omitted
pub async fn count_per_team(conn: &mut SqliteConnection) -> CoreResult<Vec<(String, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT t.name AS label, COUNT(tm.id) AS count
        FROM teams t
        JOIN team_members tm ON tm.team_id = t.id
        GROUP BY t.id, t.name
        ORDER BY count DESC, label ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(label_count).collect())
}

pub async fn delete(conn: &mut SqliteConnection, id: MembershipId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_for_team(conn: &mut SqliteConnection, team_id: TeamId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_for_user(conn: &mut SqliteConnection, user_id: UserId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM team_members WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
