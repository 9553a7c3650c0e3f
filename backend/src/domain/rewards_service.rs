//! Points and rewards engine.
//!
//! Runs after an order is durable. The stats update is the only step whose
//! failure fails the award; achievement and rank lookups degrade to an empty
//! list and a missing rank change.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AchievementRepository, AchievementRepositoryError, LeaderboardQuery, OrderRepository,
    OrderRepositoryError, RewardsEngine, SaleRecord, UserStatsRepository,
};
use crate::domain::{
    AchievementCategory, BusinessCalendar, Error, Order, OrderGamificationResult, PointsAward,
    ProgressContext, RankChange, SaleApplication, StreakSummary, TimeRange, UnlockedAchievement,
    UserId, calculate_points, evaluate,
};

#[derive(Debug, thiserror::Error)]
enum AchievementStepError {
    #[error(transparent)]
    Achievements(#[from] AchievementRepositoryError),
    #[error(transparent)]
    Orders(#[from] OrderRepositoryError),
}

/// Rewards engine backed by the stats, achievement and order repositories.
#[derive(Clone)]
pub struct RewardsService<S, A, O, L> {
    stats_repo: Arc<S>,
    achievement_repo: Arc<A>,
    order_repo: Arc<O>,
    leaderboard: Arc<L>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
    rank_range: TimeRange,
}

impl<S, A, O, L> RewardsService<S, A, O, L> {
    /// Create a service reporting rank movement over `TimeRange::Week`.
    pub fn new(
        stats_repo: Arc<S>,
        achievement_repo: Arc<A>,
        order_repo: Arc<O>,
        leaderboard: Arc<L>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
    ) -> Self {
        Self {
            stats_repo,
            achievement_repo,
            order_repo,
            leaderboard,
            clock,
            calendar,
            rank_range: TimeRange::Week,
        }
    }

    /// Window used for the before/after rank comparison.
    pub fn with_rank_range(mut self, rank_range: TimeRange) -> Self {
        self.rank_range = rank_range;
        self
    }
}

impl<S, A, O, L> RewardsService<S, A, O, L>
where
    S: UserStatsRepository,
    A: AchievementRepository,
    O: OrderRepository,
    L: LeaderboardQuery,
{
    /// Read the user's rank; `None` when the read failed.
    async fn read_rank(&self, user_id: &UserId) -> Option<Option<u32>> {
        match self.leaderboard.user_rank(user_id, self.rank_range).await {
            Ok(rank) => Some(rank),
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "rank lookup failed");
                None
            }
        }
    }

    /// Unlock every definition the sale satisfies.
    ///
    /// Bonus points credited by one unlock count towards point thresholds in
    /// the same award, so evaluation repeats until nothing new unlocks.
    async fn unlock_achievements(
        &self,
        order: &Order,
        application: &SaleApplication,
    ) -> Result<Vec<UnlockedAchievement>, AchievementStepError> {
        let user_id = &order.salesperson_id;
        let definitions = self.achievement_repo.definitions().await?;
        let mut unlocked: HashSet<_> = self
            .achievement_repo
            .unlocked_for(user_id)
            .await?
            .into_iter()
            .map(|achievement| achievement.achievement_id)
            .collect();
        let lifetime_sales = self.order_repo.count_qualifying(user_id).await?;
        let mut lifetime_points = application.after.lifetime_points;

        let earned_at = self.clock.utc();
        let mut newly_unlocked = Vec::new();
        loop {
            let context = ProgressContext {
                lifetime_sales,
                current_streak: application.after.streak.current,
                lifetime_points,
                triggering_sale: Some(order),
                calendar: &self.calendar,
            };
            let satisfied = evaluate(&definitions, &unlocked, &context);
            if satisfied.is_empty() {
                break;
            }
            for definition in satisfied {
                unlocked.insert(definition.id);
                let inserted = self
                    .achievement_repo
                    .insert_unlock(user_id, &definition.id, earned_at)
                    .await?;
                if !inserted {
                    continue;
                }
                if definition.points_reward > 0 {
                    match self
                        .stats_repo
                        .add_bonus_points(user_id, definition.points_reward)
                        .await
                    {
                        Ok(()) => {
                            lifetime_points = lifetime_points
                                .saturating_add(u64::from(definition.points_reward));
                        }
                        Err(error) => warn!(
                            user_id = %user_id,
                            achievement_id = %definition.id,
                            error = %error,
                            "failed to credit achievement bonus"
                        ),
                    }
                }
                newly_unlocked.push(UnlockedAchievement::from(definition));
            }
        }
        Ok(newly_unlocked)
    }
}

#[async_trait]
impl<S, A, O, L> RewardsEngine for RewardsService<S, A, O, L>
where
    S: UserStatsRepository,
    A: AchievementRepository,
    O: OrderRepository,
    L: LeaderboardQuery,
{
    async fn award_order(&self, order: &Order) -> Result<OrderGamificationResult, Error> {
        if !order.is_qualifying() {
            return Err(Error::conflict("cancelled orders earn no rewards"));
        }
        if order.points_awarded.is_some() {
            return Err(Error::conflict(format!(
                "order {} was already awarded",
                order.id
            )));
        }

        let user_id = &order.salesperson_id;
        let old_rank = self.read_rank(user_id).await;

        let breakdown = calculate_points(order.sale_type, order.add_ons_count);
        let sale = SaleRecord {
            order_id: order.id,
            user_id: user_id.clone(),
            points: breakdown.total_points,
            sale_day: self.calendar.day_of(order.created_at),
        };
        let application = self.stats_repo.record_sale(&sale).await?;

        let achievements = match self.unlock_achievements(order, &application).await {
            Ok(achievements) => achievements,
            Err(error) => {
                warn!(user_id = %user_id, order_id = %order.id, error = %error, "achievement evaluation failed");
                Vec::new()
            }
        };
        let bonus_points = achievements
            .iter()
            .filter(|achievement| achievement.category == AchievementCategory::Streak)
            .map(|achievement| achievement.points_reward)
            .fold(0_u32, u32::saturating_add);

        let new_rank = self.read_rank(user_id).await;
        let rank_change = old_rank
            .zip(new_rank)
            .map(|(old, new)| RankChange::between(old, new));

        info!(
            user_id = %user_id,
            order_id = %order.id,
            points = breakdown.total_points,
            streak = application.after.streak.current,
            unlocked = achievements.len(),
            "order rewarded"
        );

        Ok(OrderGamificationResult {
            points: PointsAward {
                total_points: breakdown.total_points,
                breakdown,
            },
            streak: StreakSummary::from_update(&application.streak, bonus_points),
            achievements,
            rank_change,
        })
    }
}
