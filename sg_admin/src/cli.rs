//! Command line parsing.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use pico_args::Arguments;
use slayergates::{
    MatchStatus, NewTeam, NewTournament,
    models::{MatchId, SchoolId, TeamId, TournamentId, UserId},
};

pub const HELP: &str = "\
Administer a SlayerGates league database

USAGE:
  sg_admin [OPTIONS] <GROUP> <ACTION> [ARGS]

OPTIONS:
  --db-url URL             Database connection string  [default: env DATABASE_URL or sqlite://slayergates.db]

FLAGS:
  -h, --help               Print help information

COMMANDS:
  init                                           Create or upgrade the schema
  school add <NAME> <CITY>
  school list
  school delete <ID>
  user add <HANDLE> <EMAIL> <PASSWORD> [--admin]
  user list [--search TEXT] [--school ID]
  user verify <HANDLE> <PASSWORD>
  user delete <ID>
  team add <NAME> --school ID --captain ID [--logo URL] [--description TEXT]
  team list [--recent N]
  team delete <ID>
  team members <TEAM>
  team add-member <TEAM> <USER> [--role ROLE]
  team remove-member <MEMBERSHIP>
  team request <TEAM> <USER>
  team accept <REQUEST>
  team reject <REQUEST>
  team pending <TEAM>
  tournament add --title T --game G --description D --capacity N --players-per-team N
                 --start RFC3339 --creator ID [--end RFC3339] [--format F] [--location L] [--offline]
  tournament list
  tournament show <ID>
  tournament status <ID> <LABEL>
  tournament delete <ID>
  tournament register <TOURNAMENT> <TEAM>
  tournament unregister <TOURNAMENT> <TEAM>
  tournament registrations [TOURNAMENT]
  tournament slots [TOURNAMENT]
  tournament lineup <TOURNAMENT> <TEAM> <USER,USER,...>
  match add <TOURNAMENT> <TEAM1> <TEAM2> [--round N] [--at RFC3339]
  match show <ID>
  match list [--tournament ID [--round N] | --team ID [--status S]]
  match status <ID> <PENDING|IN_PROGRESS|COMPLETED|CANCELLED>
  match score <ID> <SCORE> [--winner TEAM]
  match delete <ID>
  match current
  match history [--limit N]
  match orphans
  stats users | teams | players | schools
  stats leaderboard [--refresh]

ENVIRONMENT:
  DATABASE_URL                   SQLite connection string
  DB_MAX_CONNECTIONS             Pool size (default: 5)
  DB_CONNECTION_TIMEOUT_SECS     Acquire timeout (default: 10)
  PASSWORD_PEPPER                Password hashing pepper (required, 16+ characters)
  ENFORCE_TOURNAMENT_CAPACITY    Refuse registrations to full tournaments (default: false)
  STRICT_MATCH_TRANSITIONS       Only allow lifecycle graph edges (default: false)
  RUST_LOG                       Log filter (default: info,sqlx=warn)
";

/// One administrative operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Init,

    SchoolAdd { name: String, city: String },
    SchoolList,
    SchoolDelete { id: SchoolId },

    UserAdd { handle: String, email: String, password: String, admin: bool },
    UserList { search: Option<String>, school: Option<SchoolId> },
    UserVerify { handle: String, password: String },
    UserDelete { id: UserId },

    TeamAdd(NewTeam),
    TeamList { recent: Option<i64> },
    TeamDelete { id: TeamId },
    TeamMembers { team: TeamId },
    MemberAdd { team: TeamId, user: UserId, role: String },
    MemberRemove { membership: i64 },
    JoinRequest { team: TeamId, user: UserId },
    JoinAccept { request: i64 },
    JoinReject { request: i64 },
    JoinPending { team: TeamId },

    TournamentAdd(NewTournament),
    TournamentList,
    TournamentShow { id: TournamentId },
    TournamentStatus { id: TournamentId, label: String },
    TournamentDelete { id: TournamentId },
    Register { tournament: TournamentId, team: TeamId },
    Unregister { tournament: TournamentId, team: TeamId },
    Registrations { tournament: Option<TournamentId> },
    Slots { tournament: Option<TournamentId> },
    Lineup { tournament: TournamentId, team: TeamId, players: Vec<UserId> },

    MatchAdd {
        tournament: TournamentId,
        team1: TeamId,
        team2: TeamId,
        round: i64,
        at: Option<DateTime<Utc>>,
    },
    MatchShow { id: MatchId },
    MatchList {
        tournament: Option<TournamentId>,
        round: Option<i64>,
        team: Option<TeamId>,
        status: Option<MatchStatus>,
    },
    MatchSetStatus { id: MatchId, label: String },
    MatchScore { id: MatchId, score: String, winner: Option<TeamId> },
    MatchDelete { id: MatchId },
    MatchCurrent,
    MatchHistory { limit: Option<i64> },
    MatchOrphans,

    StatsUsers,
    StatsTeams,
    StatsPlayers,
    StatsSchools,
    Leaderboard { refresh: bool },
}

impl Command {
    /// Short name used in audit logs
    pub fn label(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::SchoolAdd { .. } => "school add",
            Command::SchoolList => "school list",
            Command::SchoolDelete { .. } => "school delete",
            Command::UserAdd { .. } => "user add",
            Command::UserList { .. } => "user list",
            Command::UserVerify { .. } => "user verify",
            Command::UserDelete { .. } => "user delete",
            Command::TeamAdd(_) => "team add",
            Command::TeamList { .. } => "team list",
            Command::TeamDelete { .. } => "team delete",
            Command::TeamMembers { .. } => "team members",
            Command::MemberAdd { .. } => "team add-member",
            Command::MemberRemove { .. } => "team remove-member",
            Command::JoinRequest { .. } => "team request",
            Command::JoinAccept { .. } => "team accept",
            Command::JoinReject { .. } => "team reject",
            Command::JoinPending { .. } => "team pending",
            Command::TournamentAdd(_) => "tournament add",
            Command::TournamentList => "tournament list",
            Command::TournamentShow { .. } => "tournament show",
            Command::TournamentStatus { .. } => "tournament status",
            Command::TournamentDelete { .. } => "tournament delete",
            Command::Register { .. } => "tournament register",
            Command::Unregister { .. } => "tournament unregister",
            Command::Registrations { .. } => "tournament registrations",
            Command::Slots { .. } => "tournament slots",
            Command::Lineup { .. } => "tournament lineup",
            Command::MatchAdd { .. } => "match add",
            Command::MatchShow { .. } => "match show",
            Command::MatchList { .. } => "match list",
            Command::MatchSetStatus { .. } => "match status",
            Command::MatchScore { .. } => "match score",
            Command::MatchDelete { .. } => "match delete",
            Command::MatchCurrent => "match current",
            Command::MatchHistory { .. } => "match history",
            Command::MatchOrphans => "match orphans",
            Command::StatsUsers => "stats users",
            Command::StatsTeams => "stats teams",
            Command::StatsPlayers => "stats players",
            Command::StatsSchools => "stats schools",
            Command::Leaderboard { .. } => "stats leaderboard",
        }
    }

    /// True for commands that only read
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::SchoolList
                | Command::UserList { .. }
                | Command::TeamList { .. }
                | Command::TeamMembers { .. }
                | Command::JoinPending { .. }
                | Command::TournamentList
                | Command::TournamentShow { .. }
                | Command::Registrations { .. }
                | Command::Slots { .. }
                | Command::MatchShow { .. }
                | Command::MatchList { .. }
                | Command::MatchCurrent
                | Command::MatchHistory { .. }
                | Command::MatchOrphans
                | Command::StatsUsers
                | Command::StatsTeams
                | Command::StatsPlayers
                | Command::StatsSchools
                | Command::Leaderboard { refresh: false }
        )
    }
}

fn parse_id_list(raw: &str) -> Result<Vec<i64>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Parse the group/action pair and its arguments
///
/// Options are pulled before positional arguments so they may appear
/// anywhere after the action.
pub fn parse(mut pargs: Arguments) -> Result<Command> {
    let group: String = pargs
        .subcommand()?
        .ok_or_else(|| anyhow!("missing command, see --help"))?;

    let command = if group == "init" {
        Command::Init
    } else {
        let action: String = pargs
            .subcommand()?
            .ok_or_else(|| anyhow!("missing action for '{group}', see --help"))?;
        parse_action(&group, &action, &mut pargs)?
    };

    let rest = pargs.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }

    Ok(command)
}

fn parse_action(group: &str, action: &str, pargs: &mut Arguments) -> Result<Command> {
    let command = match (group, action) {
        ("school", "add") => Command::SchoolAdd {
            name: pargs.free_from_str()?,
            city: pargs.free_from_str()?,
        },
        ("school", "list") => Command::SchoolList,
        ("school", "delete") => Command::SchoolDelete {
            id: pargs.free_from_str()?,
        },

        ("user", "add") => {
            let admin = pargs.contains("--admin");
            Command::UserAdd {
                admin,
                handle: pargs.free_from_str()?,
                email: pargs.free_from_str()?,
                password: pargs.free_from_str()?,
            }
        }
        ("user", "list") => Command::UserList {
            search: pargs.opt_value_from_str("--search")?,
            school: pargs.opt_value_from_str("--school")?,
        },
        ("user", "verify") => Command::UserVerify {
            handle: pargs.free_from_str()?,
            password: pargs.free_from_str()?,
        },
        ("user", "delete") => Command::UserDelete {
            id: pargs.free_from_str()?,
        },

        ("team", "add") => {
            let school_id = pargs.value_from_str("--school")?;
            let captain_id = pargs.value_from_str("--captain")?;
            let logo = pargs.opt_value_from_str("--logo")?;
            let description = pargs.opt_value_from_str("--description")?;
            Command::TeamAdd(NewTeam {
                name: pargs.free_from_str()?,
                school_id,
                captain_id,
                logo,
                description,
            })
        }
        ("team", "list") => Command::TeamList {
            recent: pargs.opt_value_from_str("--recent")?,
        },
        ("team", "delete") => Command::TeamDelete {
            id: pargs.free_from_str()?,
        },
        ("team", "members") => Command::TeamMembers {
            team: pargs.free_from_str()?,
        },
        ("team", "add-member") => {
            let role = pargs
                .opt_value_from_str("--role")?
                .unwrap_or_else(|| "player".to_string());
            Command::MemberAdd {
                role,
                team: pargs.free_from_str()?,
                user: pargs.free_from_str()?,
            }
        }
        ("team", "remove-member") => Command::MemberRemove {
            membership: pargs.free_from_str()?,
        },
        ("team", "request") => Command::JoinRequest {
            team: pargs.free_from_str()?,
            user: pargs.free_from_str()?,
        },
        ("team", "accept") => Command::JoinAccept {
            request: pargs.free_from_str()?,
        },
        ("team", "reject") => Command::JoinReject {
            request: pargs.free_from_str()?,
        },
        ("team", "pending") => Command::JoinPending {
            team: pargs.free_from_str()?,
        },

        ("tournament", "add") => Command::TournamentAdd(NewTournament {
            title: pargs.value_from_str("--title")?,
            game: pargs.value_from_str("--game")?,
            description: pargs.value_from_str("--description")?,
            format: pargs
                .opt_value_from_str("--format")?
                .unwrap_or_else(|| "single elimination".to_string()),
            max_capacity: pargs.value_from_str("--capacity")?,
            is_online: !pargs.contains("--offline"),
            location: pargs.opt_value_from_str("--location")?,
            start_time: pargs.value_from_str("--start")?,
            end_time: pargs.opt_value_from_str("--end")?,
            players_per_team: pargs.value_from_str("--players-per-team")?,
            creator_id: pargs.value_from_str("--creator")?,
        }),
        ("tournament", "list") => Command::TournamentList,
        ("tournament", "show") => Command::TournamentShow {
            id: pargs.free_from_str()?,
        },
        ("tournament", "status") => Command::TournamentStatus {
            id: pargs.free_from_str()?,
            label: pargs.free_from_str()?,
        },
        ("tournament", "delete") => Command::TournamentDelete {
            id: pargs.free_from_str()?,
        },
        ("tournament", "register") => Command::Register {
            tournament: pargs.free_from_str()?,
            team: pargs.free_from_str()?,
        },
        ("tournament", "unregister") => Command::Unregister {
            tournament: pargs.free_from_str()?,
            team: pargs.free_from_str()?,
        },
        ("tournament", "registrations") => Command::Registrations {
            tournament: pargs.opt_free_from_str()?,
        },
        ("tournament", "slots") => Command::Slots {
            tournament: pargs.opt_free_from_str()?,
        },
        ("tournament", "lineup") => Command::Lineup {
            tournament: pargs.free_from_str()?,
            team: pargs.free_from_str()?,
            players: pargs.free_from_fn(parse_id_list)?,
        },

        ("match", "add") => {
            let round = pargs.opt_value_from_str("--round")?.unwrap_or(1);
            let at = pargs.opt_value_from_str("--at")?;
            Command::MatchAdd {
                round,
                at,
                tournament: pargs.free_from_str()?,
                team1: pargs.free_from_str()?,
                team2: pargs.free_from_str()?,
            }
        }
        ("match", "show") => Command::MatchShow {
            id: pargs.free_from_str()?,
        },
        ("match", "list") => Command::MatchList {
            tournament: pargs.opt_value_from_str("--tournament")?,
            round: pargs.opt_value_from_str("--round")?,
            team: pargs.opt_value_from_str("--team")?,
            status: pargs.opt_value_from_str("--status")?,
        },
        ("match", "status") => Command::MatchSetStatus {
            id: pargs.free_from_str()?,
            label: pargs.free_from_str()?,
        },
        ("match", "score") => {
            let winner = pargs.opt_value_from_str("--winner")?;
            Command::MatchScore {
                winner,
                id: pargs.free_from_str()?,
                score: pargs.free_from_str()?,
            }
        }
        ("match", "delete") => Command::MatchDelete {
            id: pargs.free_from_str()?,
        },
        ("match", "current") => Command::MatchCurrent,
        ("match", "history") => Command::MatchHistory {
            limit: pargs.opt_value_from_str("--limit")?,
        },
        ("match", "orphans") => Command::MatchOrphans,

        ("stats", "users") => Command::StatsUsers,
        ("stats", "teams") => Command::StatsTeams,
        ("stats", "players") => Command::StatsPlayers,
        ("stats", "schools") => Command::StatsSchools,
        ("stats", "leaderboard") => Command::Leaderboard {
            refresh: pargs.contains("--refresh"),
        },

        (group, action) => bail!("unknown command '{group} {action}', see --help"),
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse_args(args: &[&str]) -> Result<Command> {
        parse(Arguments::from_vec(
            args.iter().map(OsString::from).collect(),
        ))
    }

    #[test]
    fn test_parse_school_add() {
        assert_eq!(
            parse_args(&["school", "add", "Hoche", "Versailles"]).unwrap(),
            Command::SchoolAdd {
                name: "Hoche".to_string(),
                city: "Versailles".to_string()
            }
        );
    }

    #[test]
    fn test_parse_options_anywhere_after_action() {
        assert_eq!(
            parse_args(&["match", "score", "7", "--winner", "3", "16-14"]).unwrap(),
            Command::MatchScore {
                id: 7,
                score: "16-14".to_string(),
                winner: Some(3)
            }
        );
        assert_eq!(
            parse_args(&["user", "add", "--admin", "ops", "ops@x.org", "Xq7#Lm2!Rt9$"]).unwrap(),
            Command::UserAdd {
                handle: "ops".to_string(),
                email: "ops@x.org".to_string(),
                password: "Xq7#Lm2!Rt9$".to_string(),
                admin: true
            }
        );
    }

    #[test]
    fn test_parse_match_list_filters() {
        assert_eq!(
            parse_args(&["match", "list", "--team", "4", "--status", "in_progress"]).unwrap(),
            Command::MatchList {
                tournament: None,
                round: None,
                team: Some(4),
                status: Some(MatchStatus::InProgress)
            }
        );
        assert!(parse_args(&["match", "list", "--status", "done"]).is_err());
    }

    #[test]
    fn test_parse_lineup_and_optional_ids() {
        assert_eq!(
            parse_args(&["tournament", "lineup", "1", "2", "5,6, 7"]).unwrap(),
            Command::Lineup {
                tournament: 1,
                team: 2,
                players: vec![5, 6, 7]
            }
        );
        assert_eq!(
            parse_args(&["tournament", "slots"]).unwrap(),
            Command::Slots { tournament: None }
        );
    }

    #[test]
    fn test_parse_tournament_add() {
        let command = parse_args(&[
            "tournament",
            "add",
            "--title",
            "Spring Cup",
            "--game",
            "Valorant",
            "--description",
            "Inter-school",
            "--capacity",
            "16",
            "--players-per-team",
            "5",
            "--start",
            "2025-04-01T09:00:00Z",
            "--creator",
            "1",
            "--offline",
        ])
        .unwrap();

        let Command::TournamentAdd(tournament) = command else {
            panic!("unexpected command {command:?}");
        };
        assert_eq!(tournament.title, "Spring Cup");
        assert!(!tournament.is_online);
        assert_eq!(tournament.format, "single elimination");
        assert_eq!(tournament.end_time, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&["school"]).is_err());
        assert!(parse_args(&["school", "rename"]).is_err());
        assert!(parse_args(&["school", "delete", "abc"]).is_err());
        assert!(parse_args(&["school", "list", "extra"]).is_err());
    }

    #[test]
    fn test_read_only_classification() {
        assert!(Command::SchoolList.is_read_only());
        assert!(!Command::Leaderboard { refresh: true }.is_read_only());
        assert!(!Command::Init.is_read_only());
        assert_eq!(Command::MatchOrphans.label(), "match orphans");
    }
}
