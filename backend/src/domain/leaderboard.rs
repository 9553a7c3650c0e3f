//! Leaderboard ranking, badges and rank deltas.
//!
//! Aggregation happens in the datastore; this module turns per-user window
//! totals into a deterministic ranking. Ties on points are broken by account
//! creation time and then by user id, so re-reading unchanged data never
//! reshuffles the board.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{StreakState, TeamId, UserId};

/// Entries returned when the caller does not ask for a limit.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;
/// Largest page a caller may request.
pub const MAX_LEADERBOARD_LIMIT: usize = 200;
/// Ranks at or above this are on the podium.
pub const PODIUM_SIZE: u32 = 3;

/// Streak length awarding the `hot_streak` badge.
const HOT_STREAK_DAYS: u32 = 3;
/// Streak length awarding the `on_fire` badge.
const ON_FIRE_DAYS: u32 = 7;

/// Window totals for one salesperson as read from the datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub user_id: UserId,
    pub display_name: String,
    pub team_id: Option<TeamId>,
    pub account_created_at: DateTime<Utc>,
    /// Order points plus achievement rewards earned inside the window.
    pub window_points: u64,
    /// Non-cancelled orders created inside the window.
    pub order_count: u64,
    pub streak: StreakState,
}

/// Sales team metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// Decorations shown next to a leaderboard entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Champion,
    Podium,
    HotStreak,
    OnFire,
    TeamLeader,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub user_name: String,
    pub rank: u32,
    pub total_points: u64,
    pub streak_days: u32,
    pub order_count: u64,
    pub is_current_user: bool,
    pub badges: Vec<Badge>,
    /// Positions gained since the previous period; `None` without a snapshot.
    pub rank_change: Option<i64>,
}

/// Leaderboard read outcome. Aggregation failures leave `entries` empty and
/// set `error` instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResult {
    pub entries: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LeaderboardResult {
    /// Successful read.
    pub fn ok(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries,
            error: None,
        }
    }

    /// Degraded read carrying the failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Team totals within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    #[schema(value_type = String, format = "uuid")]
    pub team_id: TeamId,
    pub team_name: String,
    pub rank: u32,
    pub total_points: u64,
    pub member_count: u32,
}

/// Movement of a user's rank caused by one award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankChange {
    pub old_rank: Option<u32>,
    pub new_rank: Option<u32>,
    pub is_significant: bool,
}

impl RankChange {
    /// Compare ranks read before and after an award.
    ///
    /// Significant when the position moved, the user entered (or left) the
    /// board, or the user crossed the podium boundary.
    pub fn between(old_rank: Option<u32>, new_rank: Option<u32>) -> Self {
        let on_podium = |rank: Option<u32>| rank.is_some_and(|r| r <= PODIUM_SIZE);
        let is_significant = old_rank != new_rank || on_podium(old_rank) != on_podium(new_rank);
        Self {
            old_rank,
            new_rank,
            is_significant,
        }
    }
}

fn compare_rows(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.window_points
        .cmp(&a.window_points)
        .then_with(|| a.account_created_at.cmp(&b.account_created_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort rows into board order and drop users without points in the window.
///
/// Ranks are dense positions: the first row is rank 1, the second rank 2, and
/// so on, with ties already resolved by the ordering.
pub fn rank_rows(mut rows: Vec<LeaderboardRow>) -> Vec<(u32, LeaderboardRow)> {
    rows.retain(|row| row.window_points > 0);
    rows.sort_by(compare_rows);
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| (u32::try_from(index + 1).unwrap_or(u32::MAX), row))
        .collect()
}

/// Rank of `user` on the board built from `rows`, if present.
pub fn rank_of(rows: Vec<LeaderboardRow>, user: &UserId) -> Option<u32> {
    rank_rows(rows)
        .into_iter()
        .find(|(_, row)| &row.user_id == user)
        .map(|(rank, _)| rank)
}

/// Aggregate member totals into ranked team standings.
///
/// Teams are ordered by points descending, then by name.
pub fn rank_teams(rows: &[LeaderboardRow], teams: &[Team]) -> Vec<TeamStanding> {
    let mut totals: HashMap<TeamId, (u64, u32)> = HashMap::new();
    for row in rows {
        if let Some(team_id) = row.team_id {
            let entry = totals.entry(team_id).or_default();
            entry.0 = entry.0.saturating_add(row.window_points);
            entry.1 = entry.1.saturating_add(1);
        }
    }

    let mut standings: Vec<TeamStanding> = teams
        .iter()
        .map(|team| {
            let (total_points, member_count) = totals.get(&team.id).copied().unwrap_or_default();
            TeamStanding {
                team_id: team.id,
                team_name: team.name.clone(),
                rank: 0,
                total_points,
                member_count,
            }
        })
        .collect();
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
    standings
}

/// Team currently leading the window, if any team scored.
pub fn leading_team(standings: &[TeamStanding]) -> Option<TeamId> {
    standings
        .first()
        .filter(|standing| standing.total_points > 0)
        .map(|standing| standing.team_id)
}

/// Inputs needed to decorate ranked rows.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    pub viewer: &'a UserId,
    pub today: NaiveDate,
    pub leading_team: Option<TeamId>,
    /// Ranks from the previous period snapshot; `None` when no snapshot exists.
    pub previous_ranks: Option<&'a HashMap<UserId, u32>>,
}

fn badges_for(rank: u32, streak_days: u32, team_id: Option<TeamId>, leader: Option<TeamId>) -> Vec<Badge> {
    let mut badges = Vec::new();
    if rank == 1 {
        badges.push(Badge::Champion);
    } else if rank <= PODIUM_SIZE {
        badges.push(Badge::Podium);
    }
    if streak_days >= HOT_STREAK_DAYS {
        badges.push(Badge::HotStreak);
    }
    if streak_days >= ON_FIRE_DAYS {
        badges.push(Badge::OnFire);
    }
    if team_id.is_some() && team_id == leader {
        badges.push(Badge::TeamLeader);
    }
    badges
}

/// Turn ranked rows into display entries.
pub fn build_entries(
    ranked: Vec<(u32, LeaderboardRow)>,
    context: &EntryContext<'_>,
) -> Vec<LeaderboardEntry> {
    ranked
        .into_iter()
        .map(|(rank, row)| {
            let streak_days = row.streak.current_as_of(context.today);
            let rank_change = context.previous_ranks.and_then(|previous| {
                previous
                    .get(&row.user_id)
                    .map(|old| i64::from(*old) - i64::from(rank))
            });
            LeaderboardEntry {
                is_current_user: &row.user_id == context.viewer,
                badges: badges_for(rank, streak_days, row.team_id, context.leading_team),
                user_id: row.user_id,
                user_name: row.display_name,
                rank,
                total_points: row.window_points,
                streak_days,
                order_count: row.order_count,
                rank_change,
            }
        })
        .collect()
}

/// Clamp a requested page size.
pub fn effective_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}
