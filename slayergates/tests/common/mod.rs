//! Shared fixtures for the integration tests.
//!
//! Every test opens its own migrated in-memory database.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use slayergates::{
    auth::{AccountManager, Argon2Hasher},
    cascade::DeletionCoordinator,
    catalog::CatalogManager,
    db::Database,
    matches::MatchEngine,
    models::{NewTeam, NewTournament, NewUser, Role, School, Team, Tournament, User},
    roster::RosterManager,
    stats::StatsAggregator,
    store,
};
use std::sync::Arc;

pub const TEST_PEPPER: &str = "integration-test-pepper";

pub struct Harness {
    pub db: Database,
    pub catalog: CatalogManager,
    pub roster: RosterManager,
    pub engine: MatchEngine,
    pub cascade: DeletionCoordinator,
    pub stats: StatsAggregator,
    pub accounts: AccountManager,
}

pub async fn harness() -> Harness {
    let db = Database::in_memory().await.expect("open in-memory database");
    let pool = db.pool();

    Harness {
        catalog: CatalogManager::new(pool.clone()),
        roster: RosterManager::new(pool.clone()),
        engine: MatchEngine::new(pool.clone()),
        cascade: DeletionCoordinator::new(pool.clone()),
        stats: StatsAggregator::new(pool.clone()),
        accounts: AccountManager::new(pool, Arc::new(Argon2Hasher::new(TEST_PEPPER))),
        db,
    }
}

impl Harness {
    /// Insert a user directly, skipping password hashing
    pub async fn user_at(&self, handle: &str, created_at: DateTime<Utc>) -> User {
        let mut conn = self.db.pool().acquire().await.unwrap();
        store::users::insert(
            &mut conn,
            &NewUser {
                handle: handle.to_string(),
                email: format!("{handle}@league.test"),
                password_hash: "not-a-real-hash".to_string(),
                role: Role::User,
            },
            created_at,
        )
        .await
        .unwrap()
    }

    pub async fn user(&self, handle: &str) -> User {
        self.user_at(handle, Utc::now()).await
    }

    pub async fn school(&self, name: &str) -> School {
        self.catalog.create_school(name, "Lyon").await.unwrap()
    }

    pub async fn team(&self, name: &str, school: &School, captain: &User) -> Team {
        self.catalog
            .create_team(NewTeam {
                name: name.to_string(),
                school_id: school.id,
                captain_id: captain.id,
                logo: None,
                description: None,
            })
            .await
            .unwrap()
    }

    pub async fn tournament(
        &self,
        title: &str,
        creator: &User,
        max_capacity: i64,
        players_per_team: i64,
    ) -> Tournament {
        self.catalog
            .create_tournament(new_tournament(title, creator, max_capacity, players_per_team))
            .await
            .unwrap()
    }

    /// Count rows of a table, optionally restricted by a `WHERE` clause
    pub async fn count(&self, table: &str, filter: &str) -> i64 {
        let sql = if filter.is_empty() {
            format!("SELECT COUNT(*) FROM {table}")
        } else {
            format!("SELECT COUNT(*) FROM {table} WHERE {filter}")
        };
        sqlx::query_scalar(&sql)
            .fetch_one(self.db.pool().as_ref())
            .await
            .unwrap()
    }
}

pub fn new_tournament(
    title: &str,
    creator: &User,
    max_capacity: i64,
    players_per_team: i64,
) -> NewTournament {
    let start = Utc::now() + Duration::days(7);
    NewTournament {
        title: title.to_string(),
        game: "Valorant".to_string(),
        description: "Inter-school cup".to_string(),
        format: "single elimination".to_string(),
        max_capacity,
        is_online: true,
        location: None,
        start_time: start,
        end_time: Some(start + Duration::hours(8)),
        players_per_team,
        creator_id: creator.id,
    }
}
