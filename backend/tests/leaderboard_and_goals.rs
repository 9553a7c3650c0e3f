//! Leaderboard ranking, team standings, goals and commission administration
//! exercised through the real services over the in-memory store.

use std::sync::Arc;

use fieldsales::domain::ports::{CommissionCommand, GoalsCommand, GoalsQuery, LeaderboardQuery};
use fieldsales::domain::{
    Badge, CommissionRateUpdate, CommissionService, ErrorCode, GoalMetric, GoalPeriod, PlanType,
    Team, TeamId, TimeRange, UserRole,
};
use rstest::{fixture, rstest};

mod support;

use support::{World, standard_sale, upgrade_sale};

#[fixture]
fn world() -> World {
    World::new()
}

#[rstest]
#[tokio::test]
async fn ties_are_broken_by_account_age(world: World) {
    let veteran = world.salesperson("Veteran", None, 300);
    let rookie = world.salesperson("Rookie", None, 3);
    let leader = world.salesperson("Leader", None, 20);
    let idle = world.salesperson("Idle", None, 100);

    world.sell(&rookie, standard_sale(0)).await;
    world.sell(&veteran, standard_sale(0)).await;
    world.sell(&leader, upgrade_sale()).await;

    let board = world
        .leaderboard
        .leaderboard(&rookie.id, TimeRange::Week, None)
        .await;

    assert!(board.error.is_none());
    let order: Vec<_> = board
        .entries
        .iter()
        .map(|e| (e.rank, e.user_id.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            (1, leader.id.clone()),
            (2, veteran.id.clone()),
            (3, rookie.id.clone()),
        ]
    );
    assert!(board.entries.iter().all(|e| e.user_id != idle.id));
    let viewer_flags: Vec<_> = board.entries.iter().map(|e| e.is_current_user).collect();
    assert_eq!(viewer_flags, vec![false, false, true]);
    assert!(board.entries[0].badges.contains(&Badge::Champion));
}

#[rstest]
#[tokio::test]
async fn repeated_reads_give_the_same_order(world: World) {
    for (index, name) in ["Ash", "Bo", "Cy", "Di"].into_iter().enumerate() {
        let rep = world.salesperson(name, None, 50);
        let add_ons = u32::try_from(index % 2).expect("small index");
        world.sell(&rep, standard_sale(add_ons)).await;
    }
    let viewer = world.salesperson("Viewer", None, 1);

    let first = world
        .leaderboard
        .leaderboard(&viewer.id, TimeRange::AllTime, Some(3))
        .await;
    let second = world
        .leaderboard
        .leaderboard(&viewer.id, TimeRange::AllTime, Some(3))
        .await;

    assert_eq!(first.entries.len(), 3);
    let ids = |result: &fieldsales::domain::LeaderboardResult| {
        result.entries.iter().map(|e| e.user_id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[rstest]
#[tokio::test]
async fn rank_movement_is_reported_against_last_week(world: World) {
    let steady = world.salesperson("Steady", None, 90);
    let climber = world.salesperson("Climber", None, 30);

    world.sell(&steady, upgrade_sale()).await;
    world.sell(&climber, standard_sale(0)).await;
    let last_week = world
        .leaderboard
        .leaderboard(&steady.id, TimeRange::Week, None)
        .await;
    assert!(last_week.entries.iter().all(|e| e.rank_change.is_none()));

    world.clock.advance_days(7);
    world.sell(&climber, upgrade_sale()).await;
    world.sell(&steady, standard_sale(0)).await;
    let this_week = world
        .leaderboard
        .leaderboard(&steady.id, TimeRange::Week, None)
        .await;

    let climber_entry = this_week
        .entries
        .iter()
        .find(|e| e.user_id == climber.id)
        .expect("climber ranked");
    assert_eq!(climber_entry.rank, 1);
    assert_eq!(climber_entry.rank_change, Some(1));
    let steady_entry = this_week
        .entries
        .iter()
        .find(|e| e.user_id == steady.id)
        .expect("steady ranked");
    assert_eq!(steady_entry.rank_change, Some(-1));
}

#[rstest]
#[tokio::test]
async fn team_standings_sum_member_points(world: World) {
    let north = TeamId::random();
    let south = TeamId::random();
    world.store.add_team(Team {
        id: north,
        name: "North".to_owned(),
    });
    world.store.add_team(Team {
        id: south,
        name: "South".to_owned(),
    });
    let a = world.salesperson("Ari", Some(north), 40);
    let b = world.salesperson("Bea", Some(north), 40);
    let c = world.salesperson("Cal", Some(south), 40);

    world.sell(&a, standard_sale(0)).await;
    world.sell(&b, standard_sale(0)).await;
    world.sell(&c, upgrade_sale()).await;

    let standings = world
        .leaderboard
        .team_standings(TimeRange::Week)
        .await
        .expect("standings");

    let summary: Vec<_> = standings
        .iter()
        .map(|s| (s.rank, s.team_name.as_str(), s.total_points, s.member_count))
        .collect();
    assert_eq!(summary, vec![(1, "North", 20, 2), (2, "South", 20, 1)]);

    let board = world
        .leaderboard
        .leaderboard(&a.id, TimeRange::Week, None)
        .await;
    let leader_badges: Vec<_> = board
        .entries
        .iter()
        .filter(|e| e.badges.contains(&Badge::TeamLeader))
        .map(|e| e.user_id.clone())
        .collect();
    assert_eq!(leader_badges.len(), 2);
    assert!(!leader_badges.contains(&c.id));
}

#[rstest]
#[tokio::test]
async fn goals_track_progress_within_their_period(world: World) {
    let rep = world.salesperson("Quinn", None, 10);
    let set = world
        .goals
        .set_goal(&rep.id, GoalPeriod::Weekly, GoalMetric::Sales, 2)
        .await
        .expect("goal stored");
    assert_eq!((set.current, set.completed), (0, false));

    world.sell(&rep, standard_sale(0)).await;
    world.sell(&rep, standard_sale(1)).await;
    world
        .goals
        .set_goal(&rep.id, GoalPeriod::Daily, GoalMetric::Points, 100)
        .await
        .expect("goal stored");

    let goals = world.goals.goals(&rep.id).await.expect("goals");
    let weekly = goals
        .iter()
        .find(|g| g.period == GoalPeriod::Weekly)
        .expect("weekly goal");
    assert_eq!((weekly.current, weekly.completed), (2, true));
    let daily = goals
        .iter()
        .find(|g| g.period == GoalPeriod::Daily)
        .expect("daily goal");
    assert_eq!((daily.current, daily.completed), (25, false));

    world.clock.advance_days(1);
    let tomorrow = world.goals.goals(&rep.id).await.expect("goals");
    let daily = tomorrow
        .iter()
        .find(|g| g.period == GoalPeriod::Daily)
        .expect("daily goal");
    assert_eq!(daily.current, 0);
}

#[rstest]
#[tokio::test]
async fn zero_targets_are_rejected(world: World) {
    let rep = world.salesperson("Reese", None, 10);
    let err = world
        .goals
        .set_goal(&rep.id, GoalPeriod::Monthly, GoalMetric::Sales, 0)
        .await
        .expect_err("zero target");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn role_overrides_drive_new_order_commission(world: World) {
    let commission = CommissionService::new(Arc::clone(&world.store));
    let admin = world.user_with_role("Admin", None, 500, UserRole::Admin);
    let manager = world.user_with_role("Morgan", None, 200, UserRole::Manager);
    let rep = world.salesperson("Sky", None, 10);
    world.store.set_base_rate(PlanType::Standard300, 2500);

    let denied = commission
        .set_commission_rate(
            &manager,
            CommissionRateUpdate {
                plan_type: PlanType::Standard300,
                role: Some(UserRole::Salesperson),
                amount_cents: 9900,
            },
        )
        .await
        .expect_err("managers cannot edit rates");
    assert_eq!(denied.code(), ErrorCode::Forbidden);

    commission
        .set_commission_rate(
            &admin,
            CommissionRateUpdate {
                plan_type: PlanType::Standard300,
                role: Some(UserRole::Salesperson),
                amount_cents: 3000,
            },
        )
        .await
        .expect("override stored");

    let rep_order = world.sell(&rep, standard_sale(0)).await;
    let manager_order = world.sell(&manager, standard_sale(0)).await;
    assert_eq!(rep_order.order.commission_cents, 3000);
    assert_eq!(manager_order.order.commission_cents, 2500);
}
