//! User rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{NewUser, Role, SchoolId, User, UserId},
};

const USER_COLUMNS: &str = "id, handle, email, password_hash, avatar, role, created_at";

fn map_user(row: &SqliteRow) -> CoreResult<User> {
    Ok(User {
        id: row.get("id"),
        handle: row.get("handle"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        avatar: row.get("avatar"),
        role: row.get::<String, _>("role").parse::<Role>()?,
        created_at: timestamp(row, "created_at"),
    })
}

pub async fn insert(
    conn: &mut SqliteConnection,
    user: &NewUser,
    created_at: DateTime<Utc>,
) -> CoreResult<User> {
    let row = sqlx::query(&format!(
        "INSERT INTO users (handle, email, password_hash, role, created_at) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(&user.handle)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    map_user(&row)
}

pub async fn find(conn: &mut SqliteConnection, id: UserId) -> CoreResult<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn find_by_handle(conn: &mut SqliteConnection, handle: &str) -> CoreResult<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE handle = $1"))
        .bind(handle)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn email_taken(conn: &mut SqliteConnection, email: &str) -> CoreResult<bool> {
    let row = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.is_some())
}

/// Creation timestamps of every user, oldest first
pub async fn creation_times(conn: &mut SqliteConnection) -> CoreResult<Vec<DateTime<Utc>>> {
    let rows = sqlx::query("SELECT created_at FROM users ORDER BY created_at, id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.iter().map(|row| timestamp(row, "created_at")).collect())
}

/// Users with the `user` role, optionally filtered by a handle/email
/// substring and by school (through team memberships), ordered by handle.
pub async fn search_players(
    conn: &mut SqliteConnection,
    search: Option<&str>,
    school_id: Option<SchoolId>,
) -> CoreResult<Vec<User>> {
    let pattern = search.map(|s| format!("%{}%", s.to_lowercase()));

    let rows = sqlx::query(
        r#"
        SELECT u.id, u.handle, u.email, u.password_hash, u.avatar, u.role, u.created_at
        FROM users u
        WHERE u.role = 'user'
          AND ($1 IS NULL OR LOWER(u.handle) LIKE $1 OR LOWER(u.email) LIKE $1)
          AND ($2 IS NULL OR EXISTS (
                SELECT 1
                FROM team_members tm
                JOIN teams t ON t.id = tm.team_id
                WHERE tm.user_id = u.id AND t.school_id = $2
          ))
        ORDER BY u.handle
        "#,
    )
    .bind(pattern)
    .bind(school_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(map_user).collect()
}

pub async fn delete(conn: &mut SqliteConnection, id: UserId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
