//! Goal tracking services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    GoalRepository, GoalsCommand, GoalsQuery, LeaderboardRepository,
};
use crate::domain::{
    BusinessCalendar, Error, Goal, GoalMetric, GoalPeriod, GoalProgress, UserId,
};

/// Service implementing goal ports on top of leaderboard aggregates.
#[derive(Clone)]
pub struct GoalsService<G, L> {
    goal_repo: Arc<G>,
    leaderboard_repo: Arc<L>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
}

impl<G, L> GoalsService<G, L> {
    pub fn new(
        goal_repo: Arc<G>,
        leaderboard_repo: Arc<L>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
    ) -> Self {
        Self {
            goal_repo,
            leaderboard_repo,
            clock,
            calendar,
        }
    }
}

impl<G, L> GoalsService<G, L>
where
    G: GoalRepository,
    L: LeaderboardRepository,
{
    async fn progress_of(&self, goal: &Goal) -> Result<GoalProgress, Error> {
        let window = self
            .calendar
            .window(goal.period.time_range(), self.clock.utc());
        let totals = self
            .leaderboard_repo
            .user_totals(&goal.user_id, &window)
            .await?;
        Ok(goal.progress(totals.sales, totals.points))
    }
}

#[async_trait]
impl<G, L> GoalsCommand for GoalsService<G, L>
where
    G: GoalRepository,
    L: LeaderboardRepository,
{
    async fn set_goal(
        &self,
        user_id: &UserId,
        period: GoalPeriod,
        metric: GoalMetric,
        target: u32,
    ) -> Result<GoalProgress, Error> {
        let goal = Goal::new(user_id.clone(), period, metric, target).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "target",
                "code": "invalid_target",
            }))
        })?;
        self.goal_repo.upsert(&goal).await?;
        self.progress_of(&goal).await
    }
}

#[async_trait]
impl<G, L> GoalsQuery for GoalsService<G, L>
where
    G: GoalRepository,
    L: LeaderboardRepository,
{
    async fn goals(&self, user_id: &UserId) -> Result<Vec<GoalProgress>, Error> {
        let goals = self
            .goal_repo
            .list_for_user(user_id)
            .await?;
        let mut progress = Vec::with_capacity(goals.len());
        for goal in &goals {
            progress.push(self.progress_of(goal).await?);
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockGoalRepository, MockLeaderboardRepository, WindowTotals};
    use crate::domain::ErrorCode;
    use crate::test_support::MutableClock;
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        "2026-03-05T15:00:00Z".parse().expect("valid timestamp")
    }

    fn service(
        goals: MockGoalRepository,
        leaderboard: MockLeaderboardRepository,
    ) -> GoalsService<MockGoalRepository, MockLeaderboardRepository> {
        GoalsService::new(
            Arc::new(goals),
            Arc::new(leaderboard),
            Arc::new(MutableClock::new(now())),
            BusinessCalendar::utc(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn goals_report_window_progress() {
        let user_id = UserId::random();
        let owner = user_id.clone();
        let mut goals = MockGoalRepository::new();
        goals.expect_list_for_user().returning(move |_| {
            Ok(vec![
                Goal::new(owner.clone(), GoalPeriod::Daily, GoalMetric::Sales, 3).expect("goal"),
                Goal::new(owner.clone(), GoalPeriod::Monthly, GoalMetric::Points, 500)
                    .expect("goal"),
            ])
        });
        let mut leaderboard = MockLeaderboardRepository::new();
        leaderboard.expect_user_totals().returning(|_, window| {
            // Daily window starts today; monthly on the first.
            let daily = window.start == Some("2026-03-05T00:00:00Z".parse().expect("ts"));
            Ok(if daily {
                WindowTotals { sales: 3, points: 60 }
            } else {
                WindowTotals { sales: 12, points: 240 }
            })
        });

        let progress = service(goals, leaderboard)
            .goals(&user_id)
            .await
            .expect("goals");

        assert_eq!(progress.len(), 2);
        assert!(progress[0].completed);
        assert_eq!(progress[0].current, 3);
        assert!(!progress[1].completed);
        assert_eq!(progress[1].current, 240);
    }

    #[rstest]
    #[tokio::test]
    async fn zero_target_is_invalid() {
        let mut goals = MockGoalRepository::new();
        goals.expect_upsert().never();
        let err = service(goals, MockLeaderboardRepository::new())
            .set_goal(&UserId::random(), GoalPeriod::Weekly, GoalMetric::Sales, 0)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn set_goal_upserts_and_returns_progress() {
        let mut goals = MockGoalRepository::new();
        goals
            .expect_upsert()
            .withf(|goal| goal.target == 10 && goal.metric == GoalMetric::Sales)
            .times(1)
            .returning(|_| Ok(()));
        let mut leaderboard = MockLeaderboardRepository::new();
        leaderboard
            .expect_user_totals()
            .returning(|_, _| Ok(WindowTotals { sales: 4, points: 80 }));

        let progress = service(goals, leaderboard)
            .set_goal(&UserId::random(), GoalPeriod::Weekly, GoalMetric::Sales, 10)
            .await
            .expect("goal set");
        assert_eq!(progress.current, 4);
        assert!(!progress.completed);
    }
}
