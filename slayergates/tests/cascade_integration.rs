//! Integration tests for dependency-ordered deletion.

mod common;

use common::harness;
use slayergates::ErrorKind;

#[tokio::test]
async fn test_delete_team_removes_every_dependent_row() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let carol = h.user("carol").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;
    let other = h.team("Hawks", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;
    let open = h.tournament("Open", &captain, 16, 5).await;

    // N = 2 memberships, M = 2 join requests, K = 2 registrations
    h.roster.add_member(team.id, alice.id, "player").await.unwrap();
    h.roster.add_member(team.id, bob.id, "player").await.unwrap();
    h.roster.request_to_join(team.id, carol.id).await.unwrap();
    let rejected = h.roster.request_to_join(team.id, captain.id).await.unwrap();
    h.roster.reject_join_request(rejected.id).await.unwrap();
    h.roster.register_team(cup.id, team.id).await.unwrap();
    h.roster.register_team(open.id, team.id).await.unwrap();

    // Untouched rows of another team
    h.roster.add_member(other.id, alice.id, "player").await.unwrap();
    h.roster.register_team(cup.id, other.id).await.unwrap();

    let report = h.cascade.delete_team(team.id).await.unwrap();
    assert_eq!(report.memberships, 2);
    assert_eq!(report.join_requests, 2);
    assert_eq!(report.registrations, 2);
    assert_eq!(report.dependents(), 6);

    let filter = format!("team_id = {}", team.id);
    assert_eq!(h.count("team_members", &filter).await, 0);
    assert_eq!(h.count("team_join_requests", &filter).await, 0);
    assert_eq!(h.count("tournament_registrations", &filter).await, 0);
    assert_eq!(h.count("teams", &format!("id = {}", team.id)).await, 0);

    assert_eq!(h.count("team_members", "").await, 1);
    assert_eq!(h.count("tournament_registrations", "").await, 1);

    assert_eq!(
        h.cascade.delete_team(team.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_delete_team_removes_leaderboard_row() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    let game = h
        .engine
        .create_match(cup.id, red.id, blue.id, 1, None)
        .await
        .unwrap();
    h.engine.update_score(game.id, "2-1", Some(red.id)).await.unwrap();
    h.stats.refresh_leaderboard().await.unwrap();
    h.engine.delete_match(game.id).await.unwrap();

    let report = h.cascade.delete_team(red.id).await.unwrap();
    assert_eq!(report.leaderboard_rows, 1);
    assert_eq!(h.count("leaderboard", "").await, 1);
}

#[tokio::test]
async fn test_failed_team_delete_rolls_everything_back() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let carol = h.user("carol").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    h.roster.add_member(red.id, alice.id, "player").await.unwrap();
    h.roster.request_to_join(red.id, carol.id).await.unwrap();
    h.roster.register_team(cup.id, red.id).await.unwrap();

    // A match still references the team, so the final delete is refused
    h.engine
        .create_match(cup.id, red.id, blue.id, 1, None)
        .await
        .unwrap();

    let err = h.cascade.delete_team(red.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let filter = format!("team_id = {}", red.id);
    assert_eq!(h.count("team_members", &filter).await, 1);
    assert_eq!(h.count("team_join_requests", &filter).await, 1);
    assert_eq!(h.count("tournament_registrations", &filter).await, 1);
    assert_eq!(h.count("teams", &format!("id = {}", red.id)).await, 1);
}

#[tokio::test]
async fn test_delete_user_removes_requests_and_memberships() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;

    h.roster.add_member(red.id, alice.id, "player").await.unwrap();
    h.roster.request_to_join(blue.id, alice.id).await.unwrap();

    let report = h.cascade.delete_user(alice.id).await.unwrap();
    assert_eq!(report.memberships, 1);
    assert_eq!(report.join_requests, 1);

    let filter = format!("user_id = {}", alice.id);
    assert_eq!(h.count("team_members", &filter).await, 0);
    assert_eq!(h.count("team_join_requests", &filter).await, 0);
    assert_eq!(h.count("users", &format!("id = {}", alice.id)).await, 0);

    assert_eq!(
        h.cascade.delete_user(alice.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_delete_captain_is_refused_and_rolled_back() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    h.roster.add_member(red.id, captain.id, "captain").await.unwrap();

    let err = h.cascade.delete_user(captain.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(h.count("team_members", &format!("user_id = {}", captain.id)).await, 1);
    assert_eq!(h.count("users", &format!("id = {}", captain.id)).await, 1);
}

#[tokio::test]
async fn test_delete_school_requires_no_teams() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let empty = h.school("Ampère").await;
    let team = h.team("Red", &school, &captain).await;

    let err = h.cascade.delete_school(school.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(h.count("schools", "").await, 2);

    h.cascade.delete_school(empty.id).await.unwrap();
    assert_eq!(h.count("schools", "").await, 1);

    h.cascade.delete_team(team.id).await.unwrap();
    h.cascade.delete_school(school.id).await.unwrap();
    assert_eq!(h.count("schools", "").await, 0);

    assert_eq!(
        h.cascade.delete_school(school.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_delete_tournament_removes_registrations_only() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;
    let open = h.tournament("Open", &captain, 16, 5).await;

    h.roster.register_team(cup.id, red.id).await.unwrap();
    h.roster.register_team(cup.id, blue.id).await.unwrap();
    h.roster.register_team(open.id, red.id).await.unwrap();
    h.engine
        .create_match(cup.id, red.id, blue.id, 1, None)
        .await
        .unwrap();

    let report = h.cascade.delete_tournament(cup.id).await.unwrap();
    assert_eq!(report.registrations, 2);

    assert_eq!(h.count("tournaments", "").await, 1);
    assert_eq!(h.count("tournament_registrations", "").await, 1);
    assert_eq!(h.count("matches", "").await, 1);

    assert_eq!(
        h.cascade.delete_tournament(cup.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
