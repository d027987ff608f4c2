//! Integration tests for growth curves, grouped counts and the leaderboard.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::harness;
use slayergates::stats::{GrowthPoint, LabelCount, POINTS_PER_WIN};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[tokio::test]
async fn test_user_growth_is_cumulative_per_day() {
    let h = harness().await;
    assert!(h.stats.user_growth().await.unwrap().is_empty());

    h.user_at("early", Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()).await;
    h.user_at("later", Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap()).await;
    h.user_at("third", Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap()).await;

    assert_eq!(
        h.stats.user_growth().await.unwrap(),
        vec![
            GrowthPoint { date: day(1), total: 2 },
            GrowthPoint { date: day(3), total: 3 },
        ]
    );
}

#[tokio::test]
async fn test_team_growth() {
    let h = harness().await;
    assert!(h.stats.team_growth().await.unwrap().is_empty());

    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    h.team("Red", &school, &captain).await;
    h.team("Blue", &school, &captain).await;

    let growth = h.stats.team_growth().await.unwrap();
    assert_eq!(growth.last().map(|p| p.total), Some(2));
}

#[tokio::test]
async fn test_players_per_team_sorted_and_inner_joined() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let amber = h.team("Amber", &school, &captain).await;
    h.team("Empty", &school, &captain).await;

    h.roster.add_member(red.id, alice.id, "player").await.unwrap();
    h.roster.add_member(red.id, bob.id, "player").await.unwrap();
    h.roster.add_member(blue.id, alice.id, "player").await.unwrap();
    h.roster.add_member(amber.id, bob.id, "player").await.unwrap();

    assert_eq!(
        h.stats.players_per_team().await.unwrap(),
        vec![
            LabelCount { label: "Red".to_string(), count: 2 },
            LabelCount { label: "Amber".to_string(), count: 1 },
            LabelCount { label: "Blue".to_string(), count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_registrations_per_school() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let hoche = h.school("Hoche").await;
    let ampere = h.school("Ampère").await;
    h.school("Silent").await;
    let red = h.team("Red", &hoche, &captain).await;
    let blue = h.team("Blue", &hoche, &captain).await;
    let green = h.team("Green", &ampere, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;
    let open = h.tournament("Open", &captain, 16, 5).await;

    h.roster.register_team(cup.id, red.id).await.unwrap();
    h.roster.register_team(open.id, red.id).await.unwrap();
    h.roster.register_team(cup.id, blue.id).await.unwrap();
    h.roster.register_team(cup.id, green.id).await.unwrap();

    assert_eq!(
        h.stats.registrations_per_school().await.unwrap(),
        vec![
            LabelCount { label: "Hoche".to_string(), count: 3 },
            LabelCount { label: "Ampère".to_string(), count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_refresh_leaderboard() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let green = h.team("Green", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    let m1 = h.engine.create_match(cup.id, red.id, blue.id, 1, None).await.unwrap();
    let m2 = h.engine.create_match(cup.id, red.id, green.id, 1, None).await.unwrap();
    let m3 = h.engine.create_match(cup.id, blue.id, green.id, 2, None).await.unwrap();
    h.engine.create_match(cup.id, red.id, green.id, 3, None).await.unwrap();

    h.engine.update_score(m1.id, "16-3", Some(red.id)).await.unwrap();
    h.engine.update_score(m2.id, "16-12", Some(red.id)).await.unwrap();
    h.engine.update_score(m3.id, "14-16", Some(green.id)).await.unwrap();

    assert_eq!(h.stats.refresh_leaderboard().await.unwrap(), 3);

    let board = h.stats.leaderboard().await.unwrap();
    let rows: Vec<(&str, i64, i64, i64)> = board
        .iter()
        .map(|e| (e.team_name.as_str(), e.points, e.wins, e.losses))
        .collect();
    assert_eq!(
        rows,
        [
            ("Red", 2 * POINTS_PER_WIN, 2, 0),
            ("Green", POINTS_PER_WIN, 1, 1),
            ("Blue", 0, 0, 2),
        ]
    );

    // Refreshing again updates rows in place
    assert_eq!(h.stats.refresh_leaderboard().await.unwrap(), 3);
    assert_eq!(h.count("leaderboard", "").await, 3);
}

#[tokio::test]
async fn test_refresh_leaderboard_drops_withdrawn_results() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    let game = h.engine.create_match(cup.id, red.id, blue.id, 1, None).await.unwrap();
    h.engine.update_score(game.id, "2-0", Some(red.id)).await.unwrap();
    assert_eq!(h.stats.refresh_leaderboard().await.unwrap(), 2);

    h.engine.delete_match(game.id).await.unwrap();
    assert_eq!(h.stats.refresh_leaderboard().await.unwrap(), 0);

    let board = h.stats.leaderboard().await.unwrap();
    assert_eq!(board.len(), 2);
    assert!(
        board
            .iter()
            .all(|e| e.points == 0 && e.wins == 0 && e.losses == 0),
        "stale standings: {board:?}"
    );
}

#[tokio::test]
async fn test_refresh_leaderboard_follows_changed_winner() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let red = h.team("Red", &school, &captain).await;
    let blue = h.team("Blue", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    let game = h.engine.create_match(cup.id, red.id, blue.id, 1, None).await.unwrap();
    h.engine.update_score(game.id, "2-0", Some(red.id)).await.unwrap();
    h.stats.refresh_leaderboard().await.unwrap();

    h.engine.update_score(game.id, "0-2", Some(blue.id)).await.unwrap();
    h.stats.refresh_leaderboard().await.unwrap();

    let board = h.stats.leaderboard().await.unwrap();
    let rows: Vec<(&str, i64, i64)> = board
        .iter()
        .map(|e| (e.team_name.as_str(), e.wins, e.losses))
        .collect();
    assert_eq!(rows, [("Blue", 1, 0), ("Red", 0, 1)]);
}
