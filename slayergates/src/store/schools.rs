//! School rows.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::{naive, timestamp};
use crate::{
    errors::CoreResult,
    models::{School, SchoolId},
};

fn map_school(row: &SqliteRow) -> School {
    School {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        created_at: timestamp(row, "created_at"),
    }
}

pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    city: &str,
    created_at: DateTime<Utc>,
) -> CoreResult<School> {
    let row = sqlx::query(
        r#"
        INSERT INTO schools (name, city, created_at)
        VALUES ($1, $2, $3)
        RETURNING id, name, city, created_at
        "#,
    )
    .bind(name)
    .bind(city)
    .bind(naive(created_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_school(&row))
}

pub async fn find(conn: &mut SqliteConnection, id: SchoolId) -> CoreResult<Option<School>> {
    let row = sqlx::query("SELECT id, name, city, created_at FROM schools WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(map_school))
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> CoreResult<Option<School>> {
    let row = sqlx::query("SELECT id, name, city, created_at FROM schools WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(map_school))
}

/// All schools ordered by name
pub async fn list(conn: &mut SqliteConnection) -> CoreResult<Vec<School>> {
    let rows = sqlx::query("SELECT id, name, city, created_at FROM schools ORDER BY name, id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.iter().map(map_school).collect())
}

/// Number of teams owned by a school
pub async fn team_count(conn: &mut SqliteConnection, id: SchoolId) -> CoreResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM teams WHERE school_id = $1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(row.get("n"))
}

pub async fn delete(conn: &mut SqliteConnection, id: SchoolId) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM schools WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
