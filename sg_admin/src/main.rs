//! Administrative command line for a SlayerGates league database.
//!
//! Each invocation opens the database, applies pending migrations, runs one
//! command and prints its result as JSON on stdout.

mod cli;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use serde::Serialize;
use serde_json::Value;
use slayergates::{
    CoreError, CoreResult, ErrorKind,
    auth::{AccountManager, Argon2Hasher},
    cascade::DeletionCoordinator,
    catalog::CatalogManager,
    db::Database,
    matches::MatchEngine,
    roster::RosterManager,
    stats::StatsAggregator,
};

use cli::{Command, HELP};
use config::AdminConfig;

/// Managers wired to one database
struct Services {
    catalog: CatalogManager,
    roster: RosterManager,
    engine: MatchEngine,
    cascade: DeletionCoordinator,
    stats: StatsAggregator,
    accounts: AccountManager,
}

impl Services {
    fn new(db: &Database, config: &AdminConfig) -> Self {
        let pool = db.pool();
        let hasher = Arc::new(Argon2Hasher::new(config.password_pepper.clone()));

        Self {
            catalog: CatalogManager::new(pool.clone()),
            roster: RosterManager::new(pool.clone())
                .with_capacity_enforcement(config.enforce_capacity),
            engine: MatchEngine::new(pool.clone())
                .with_strict_transitions(config.strict_transitions),
            cascade: DeletionCoordinator::new(pool.clone()),
            stats: StatsAggregator::new(pool.clone()),
            accounts: AccountManager::new(pool, hasher),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let db_url: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let command = cli::parse(pargs)?;

    logging::init();

    let config = AdminConfig::from_env(db_url)?;
    config.validate()?;

    let db = Database::new(&config.database)
        .await
        .context("failed to open database")?;
    db.migrate().await.context("failed to apply migrations")?;

    let services = Services::new(&db, &config);
    let label = command.label();
    let read_only = command.is_read_only();

    let outcome = run(&services, command).await;
    db.close().await;

    match outcome {
        Ok(value) => {
            if !read_only {
                logging::log_admin_action(label, &target_of(&value), "ok");
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, "{} failed", label);
            logging::log_admin_action(label, "-", kind_label(err.kind()));
            Err(Error::msg(err.client_message()))
        }
    }
}

/// Run one command and render its result
async fn run(services: &Services, command: Command) -> CoreResult<Value> {
    let Services {
        catalog,
        roster,
        engine,
        cascade,
        stats,
        accounts,
    } = services;

    match command {
        Command::Init => json(serde_json::json!({ "migrated": true })),

        Command::SchoolAdd { name, city } => json(catalog.create_school(&name, &city).await?),
        Command::SchoolList => json(catalog.list_schools().await?),
        Command::SchoolDelete { id } => json(cascade.delete_school(id).await?),

        Command::UserAdd {
            handle,
            email,
            password,
            admin,
        } => {
            let created = if admin {
                accounts.create_admin(&handle, &email, &password).await
            } else {
                accounts.create_user(&handle, &email, &password).await
            };
            if let Err(err) = &created {
                if err.kind() == ErrorKind::PolicyViolation {
                    logging::log_security_event("weak_admin_password", Some(&handle), &err.to_string());
                }
            }
            json(created?)
        }
        Command::UserList { search, school } => {
            json(accounts.players(search.as_deref(), school).await?)
        }
        Command::UserVerify { handle, password } => {
            match accounts.verify_credentials(&handle, &password).await {
                Ok(user) => json(user),
                Err(err) => {
                    if is_failed_login(err.kind()) {
                        logging::log_security_event("failed_login", Some(&handle), "Invalid credentials");
                    }
                    Err(err)
                }
            }
        }
        Command::UserDelete { id } => json(cascade.delete_user(id).await?),

        Command::TeamAdd(team) => json(catalog.create_team(team).await?),
        Command::TeamList { recent: None } => json(catalog.list_teams().await?),
        Command::TeamList { recent } => json(catalog.recent_teams(recent).await?),
        Command::TeamDelete { id } => json(cascade.delete_team(id).await?),
        Command::TeamMembers { team } => json(roster.team_members(team).await?),
        Command::MemberAdd { team, user, role } => {
            json(roster.add_member(team, user, &role).await?)
        }
        Command::MemberRemove { membership } => json(roster.remove_member(membership).await?),
        Command::JoinRequest { team, user } => json(roster.request_to_join(team, user).await?),
        Command::JoinAccept { request } => json(roster.accept_join_request(request).await?),
        Command::JoinReject { request } => json(roster.reject_join_request(request).await?),
        Command::JoinPending { team } => json(serde_json::json!({
            "team_id": team,
            "pending": roster.pending_join_requests(team).await?,
        })),

        Command::TournamentAdd(tournament) => json(catalog.create_tournament(tournament).await?),
        Command::TournamentList => json(catalog.list_tournaments().await?),
        Command::TournamentShow { id } => json(catalog.get_tournament(id).await?),
        Command::TournamentStatus { id, label } => {
            json(catalog.set_tournament_status(id, &label).await?)
        }
        Command::TournamentDelete { id } => json(cascade.delete_tournament(id).await?),
        Command::Register { tournament, team } => {
            json(roster.register_team(tournament, team).await?)
        }
        Command::Unregister { tournament, team } => {
            json(catalog.unregister_team(tournament, team).await?)
        }
        Command::Registrations { tournament } => {
            json(roster.list_registrations(tournament).await?)
        }
        Command::Slots { tournament: Some(id) } => json(roster.compute_slots(id).await?),
        Command::Slots { tournament: None } => json(roster.all_slots().await?),
        Command::Lineup {
            tournament,
            team,
            players,
        } => json(
            roster
                .set_participating_players(tournament, team, &players)
                .await?,
        ),

        Command::MatchAdd {
            tournament,
            team1,
            team2,
            round,
            at,
        } => json(engine.create_match(tournament, team1, team2, round, at).await?),
        Command::MatchShow { id } => json(engine.get_match(id).await?),
        Command::MatchList {
            tournament: Some(tournament),
            round,
            ..
        } => json(engine.tournament_matches(tournament, round).await?),
        Command::MatchList {
            team: Some(team),
            status,
            ..
        } => json(engine.team_matches(team, status).await?),
        Command::MatchList { .. } => json(engine.all_matches().await?),
        Command::MatchSetStatus { id, label } => json(engine.update_status(id, &label).await?),
        Command::MatchScore { id, score, winner } => {
            json(engine.update_score(id, &score, winner).await?)
        }
        Command::MatchDelete { id } => json(engine.delete_match(id).await?),
        Command::MatchCurrent => json(engine.current_matches().await?),
        Command::MatchHistory { limit } => json(engine.match_history(limit).await?),
        Command::MatchOrphans => json(engine.orphaned_matches().await?),

        Command::StatsUsers => json(stats.user_growth().await?),
        Command::StatsTeams => json(stats.team_growth().await?),
        Command::StatsPlayers => json(stats.players_per_team().await?),
        Command::StatsSchools => json(stats.registrations_per_school().await?),
        Command::Leaderboard { refresh } => {
            if refresh {
                let teams = stats.refresh_leaderboard().await?;
                tracing::info!("Leaderboard rebuilt for {} team(s)", teams);
            }
            json(stats.leaderboard().await?)
        }
    }
}

fn json(value: impl Serialize) -> CoreResult<Value> {
    serde_json::to_value(value).map_err(CoreError::from)
}

/// Entity an action touched, for the audit log
fn target_of(value: &Value) -> String {
    match value.get("id") {
        Some(id) => id.to_string(),
        None => "-".to_string(),
    }
}

/// Unknown handle or wrong password, as opposed to an internal failure
fn is_failed_login(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::NotFound | ErrorKind::InvalidArgument)
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "NotFound",
        ErrorKind::InvalidArgument => "InvalidArgument",
        ErrorKind::Conflict => "Conflict",
        ErrorKind::PolicyViolation => "PolicyViolation",
        ErrorKind::Internal => "Internal",
    }
}
