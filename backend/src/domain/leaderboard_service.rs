//! Leaderboard read model.
//!
//! Rankings are pull-based: every read aggregates the window afresh, ranks
//! the rows, and stores the result as the current period's snapshot so the
//! next period can show rank movement.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    LeaderboardQuery, LeaderboardRepository, RankSnapshot,
    RankSnapshotRepository,
};
use crate::domain::{
    BusinessCalendar, EntryContext, Error, LeaderboardResult, LeaderboardRow, TeamStanding,
    TimeRange, UserId, build_entries, effective_limit, leading_team, rank_of, rank_rows,
    rank_teams,
};

/// Service implementing [`LeaderboardQuery`].
#[derive(Clone)]
pub struct LeaderboardService<L, R> {
    leaderboard_repo: Arc<L>,
    snapshot_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
}

impl<L, R> LeaderboardService<L, R> {
    pub fn new(
        leaderboard_repo: Arc<L>,
        snapshot_repo: Arc<R>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
    ) -> Self {
        Self {
            leaderboard_repo,
            snapshot_repo,
            clock,
            calendar,
        }
    }
}

impl<L, R> LeaderboardService<L, R>
where
    L: LeaderboardRepository,
    R: RankSnapshotRepository,
{
    async fn rows_for(&self, range: TimeRange) -> Result<Vec<LeaderboardRow>, Error> {
        let window = self.calendar.window(range, self.clock.utc());
        self.leaderboard_repo
            .window_rows(&window)
            .await
            .map_err(Error::from)
    }

    async fn previous_ranks(
        &self,
        range: TimeRange,
        today: chrono::NaiveDate,
    ) -> Option<HashMap<UserId, u32>> {
        let period = self.calendar.previous_period_start(range, today);
        match self.snapshot_repo.load(range, period).await {
            Ok(snapshot) if snapshot.is_empty() => None,
            Ok(snapshot) => Some(
                snapshot
                    .into_iter()
                    .map(|entry| (entry.user_id, entry.rank))
                    .collect(),
            ),
            Err(error) => {
                warn!(range = %range, error = %error, "failed to load rank snapshot");
                None
            }
        }
    }

    async fn save_snapshot(&self, range: TimeRange, today: chrono::NaiveDate, ranks: Vec<RankSnapshot>) {
        let period = self.calendar.period_start(range, today);
        if let Err(error) = self.snapshot_repo.save(range, period, &ranks).await {
            warn!(range = %range, error = %error, "failed to save rank snapshot");
        }
    }

    async fn build(
        &self,
        viewer: &UserId,
        range: TimeRange,
        limit: Option<usize>,
    ) -> Result<LeaderboardResult, Error> {
        let now = self.clock.utc();
        let today = self.calendar.day_of(now);
        let rows = self.rows_for(range).await?;

        let teams = match self.leaderboard_repo.teams().await {
            Ok(teams) => teams,
            Err(error) => {
                warn!(error = %error, "team lookup failed; skipping team badges");
                Vec::new()
            }
        };
        let leader = leading_team(&rank_teams(&rows, &teams));

        let ranked = rank_rows(rows);
        let snapshot = ranked
            .iter()
            .map(|(rank, row)| RankSnapshot {
                user_id: row.user_id.clone(),
                rank: *rank,
            })
            .collect();
        let previous = self.previous_ranks(range, today).await;
        self.save_snapshot(range, today, snapshot).await;

        let page: Vec<_> = ranked.into_iter().take(effective_limit(limit)).collect();
        let context = EntryContext {
            viewer,
            today,
            leading_team: leader,
            previous_ranks: previous.as_ref(),
        };
        let entries = build_entries(page, &context);
        debug!(range = %range, entries = entries.len(), "leaderboard built");
        Ok(LeaderboardResult::ok(entries))
    }
}

#[async_trait]
impl<L, R> LeaderboardQuery for LeaderboardService<L, R>
where
    L: LeaderboardRepository,
    R: RankSnapshotRepository,
{
    async fn leaderboard(
        &self,
        viewer: &UserId,
        range: TimeRange,
        limit: Option<usize>,
    ) -> LeaderboardResult {
        match self.build(viewer, range, limit).await {
            Ok(result) => result,
            Err(error) => {
                warn!(range = %range, error = %error, "leaderboard aggregation failed");
                LeaderboardResult::failed(error.message())
            }
        }
    }

    async fn team_standings(&self, range: TimeRange) -> Result<Vec<TeamStanding>, Error> {
        let rows = self.rows_for(range).await?;
        let teams = self
            .leaderboard_repo
            .teams()
            .await?;
        Ok(rank_teams(&rows, &teams))
    }

    async fn user_rank(&self, user: &UserId, range: TimeRange) -> Result<Option<u32>, Error> {
        let rows = self.rows_for(range).await?;
        Ok(rank_of(rows, user))
    }
}
