//! Integration tests for registrations, seat accounting and rosters.

mod common;

use common::harness;
use slayergates::{ErrorKind, JoinRequestStatus, roster::RosterManager};

#[tokio::test]
async fn test_register_team_once() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;
    let tournament = h.tournament("Cup", &captain, 16, 5).await;

    let registration = h.roster.register_team(tournament.id, team.id).await.unwrap();
    assert_eq!(registration.team_id, team.id);
    assert!(registration.participating_players.is_none());

    let listed = h.roster.list_registrations(Some(tournament.id)).await.unwrap();
    assert_eq!(listed.iter().filter(|r| r.team_id == team.id).count(), 1);

    let err = h.roster.register_team(tournament.id, team.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(h.count("tournament_registrations", "").await, 1);
}

#[tokio::test]
async fn test_register_team_missing_entities() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;
    let tournament = h.tournament("Cup", &captain, 16, 5).await;

    let err = h.roster.register_team(tournament.id + 1, team.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = h.roster.register_team(tournament.id, team.id + 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_registrations_filter_and_order() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let a = h.team("A", &school, &captain).await;
    let b = h.team("B", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;
    let open = h.tournament("Open", &captain, 16, 5).await;

    h.roster.register_team(cup.id, a.id).await.unwrap();
    h.roster.register_team(cup.id, b.id).await.unwrap();
    h.roster.register_team(open.id, a.id).await.unwrap();

    let cup_regs = h.roster.list_registrations(Some(cup.id)).await.unwrap();
    let teams: Vec<i64> = cup_regs.iter().map(|r| r.team_id).collect();
    assert_eq!(teams, [b.id, a.id]);

    let all = h.roster.list_registrations(None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].tournament_id, open.id);
}

#[tokio::test]
async fn test_compute_slots_counts_distinct_players() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let school = h.school("Hoche").await;
    let a = h.team("A", &school, &captain).await;
    let b = h.team("B", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 10, 5).await;

    h.roster.add_member(a.id, alice.id, "player").await.unwrap();
    h.roster.add_member(a.id, bob.id, "player").await.unwrap();
    // Alice plays for both teams and must only be counted once
    h.roster.add_member(b.id, alice.id, "player").await.unwrap();

    h.roster.register_team(cup.id, a.id).await.unwrap();
    h.roster.register_team(cup.id, b.id).await.unwrap();

    let slots = h.roster.compute_slots(cup.id).await.unwrap();
    assert_eq!(slots.title, "Cup");
    assert_eq!(slots.max_capacity, 10);
    assert_eq!(slots.registered_count, 2);
    assert_eq!(slots.available_count, 8);

    assert_eq!(
        h.roster.compute_slots(cup.id + 1).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_compute_slots_never_negative() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let team = h.team("Crowd", &school, &captain).await;
    let cup = h.tournament("Tiny", &captain, 2, 1).await;

    for i in 0..5 {
        let player = h.user(&format!("player{i}")).await;
        h.roster.add_member(team.id, player.id, "player").await.unwrap();
    }
    h.roster.register_team(cup.id, team.id).await.unwrap();

    let slots = h.roster.compute_slots(cup.id).await.unwrap();
    assert_eq!(slots.registered_count, 5);
    assert_eq!(slots.available_count, 0);
}

#[tokio::test]
async fn test_all_slots_includes_empty_tournaments() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let team = h.team("A", &school, &captain).await;
    let busy = h.tournament("Busy", &captain, 4, 1).await;
    let empty = h.tournament("Empty", &captain, 6, 1).await;

    h.roster.add_member(team.id, captain.id, "captain").await.unwrap();
    h.roster.register_team(busy.id, team.id).await.unwrap();

    let slots = h.roster.all_slots().await.unwrap();
    assert_eq!(slots.len(), 2);

    let busy_slots = slots.iter().find(|s| s.tournament_id == busy.id).unwrap();
    assert_eq!((busy_slots.registered_count, busy_slots.available_count), (1, 3));

    let empty_slots = slots.iter().find(|s| s.tournament_id == empty.id).unwrap();
    assert_eq!((empty_slots.registered_count, empty_slots.available_count), (0, 6));
}

#[tokio::test]
async fn test_capacity_enforcement_is_opt_in() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let p1 = h.user("p1").await;
    let p2 = h.user("p2").await;
    let school = h.school("Hoche").await;
    let a = h.team("A", &school, &captain).await;
    let b = h.team("B", &school, &captain).await;
    let c = h.team("C", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 2, 1).await;

    h.roster.add_member(a.id, p1.id, "player").await.unwrap();
    h.roster.add_member(b.id, p2.id, "player").await.unwrap();
    h.roster.register_team(cup.id, a.id).await.unwrap();
    h.roster.register_team(cup.id, b.id).await.unwrap();

    let strict = RosterManager::new(h.db.pool()).with_capacity_enforcement(true);
    let err = strict.register_team(cup.id, c.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Default manager only reports capacity
    h.roster.register_team(cup.id, c.id).await.unwrap();
    assert_eq!(h.roster.list_registrations(Some(cup.id)).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_members_add_list_remove() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;

    let first = h.roster.add_member(team.id, captain.id, "captain").await.unwrap();
    let second = h.roster.add_member(team.id, alice.id, "player").await.unwrap();

    let roster = h.roster.team_members(team.id).await.unwrap();
    assert_eq!(roster, vec![first.clone(), second.clone()]);

    h.roster.remove_member(first.id).await.unwrap();
    assert_eq!(h.roster.team_members(team.id).await.unwrap(), vec![second]);

    assert_eq!(
        h.roster.remove_member(first.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        h.roster.add_member(team.id, 999, "player").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        h.roster.add_member(team.id, alice.id, "  ").await.unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[tokio::test]
async fn test_join_request_accept_creates_membership() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;

    let request = h.roster.request_to_join(team.id, alice.id).await.unwrap();
    assert_eq!(request.status, JoinRequestStatus::Pending);
    assert_eq!(h.roster.pending_join_requests(team.id).await.unwrap(), 1);

    let err = h.roster.request_to_join(team.id, alice.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let membership = h.roster.accept_join_request(request.id).await.unwrap();
    assert_eq!(membership.user_id, alice.id);
    assert_eq!(membership.role, "member");
    assert_eq!(h.roster.pending_join_requests(team.id).await.unwrap(), 0);
    assert_eq!(
        h.count("team_join_requests", "status = 'ACCEPTED'").await,
        1
    );

    let err = h.roster.accept_join_request(request.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(h.roster.team_members(team.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_pending_join_requests_unknown_team() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;

    assert_eq!(h.roster.pending_join_requests(team.id).await.unwrap(), 0);
    let err = h.roster.pending_join_requests(team.id + 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_join_request_reject() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;

    let request = h.roster.request_to_join(team.id, alice.id).await.unwrap();
    let rejected = h.roster.reject_join_request(request.id).await.unwrap();
    assert_eq!(rejected.status, JoinRequestStatus::Rejected);
    assert!(h.roster.team_members(team.id).await.unwrap().is_empty());

    assert_eq!(
        h.roster.reject_join_request(request.id).await.unwrap_err().kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        h.roster.reject_join_request(request.id + 10).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    // A resolved request does not block a fresh one
    h.roster.request_to_join(team.id, alice.id).await.unwrap();
}

#[tokio::test]
async fn test_participating_players_must_be_on_roster() {
    let h = harness().await;
    let captain = h.user("captain").await;
    let alice = h.user("alice").await;
    let outsider = h.user("outsider").await;
    let school = h.school("Hoche").await;
    let team = h.team("Owls", &school, &captain).await;
    let cup = h.tournament("Cup", &captain, 16, 5).await;

    h.roster.add_member(team.id, captain.id, "captain").await.unwrap();
    h.roster.add_member(team.id, alice.id, "player").await.unwrap();

    let err = h
        .roster
        .set_participating_players(cup.id, team.id, &[alice.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    h.roster.register_team(cup.id, team.id).await.unwrap();

    let err = h
        .roster
        .set_participating_players(cup.id, team.id, &[alice.id, outsider.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let registration = h
        .roster
        .set_participating_players(cup.id, team.id, &[alice.id, captain.id, alice.id])
        .await
        .unwrap();
    assert_eq!(
        registration.participating_players,
        Some(vec![alice.id, captain.id])
    );

    let listed = h.roster.list_registrations(Some(cup.id)).await.unwrap();
    assert_eq!(listed[0].participating_players, Some(vec![alice.id, captain.id]));
}
