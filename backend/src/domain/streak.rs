//! Consecutive-day sales streaks.
//!
//! A streak counts calendar days (in business time) that contain at least one
//! qualifying sale. The state machine only ever looks at the previous sale
//! day, so it can be applied inside a single row update.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Streak lengths that are celebrated in the client and seeded as
/// `streak` achievements.
pub const STREAK_MILESTONES: [u32; 6] = [3, 5, 7, 14, 21, 30];

/// Streak counters persisted on the user's stats row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_sale_day: Option<NaiveDate>,
}

/// Outcome of applying one qualifying sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub state: StreakState,
    /// A previous streak lapsed and restarted at 1.
    pub streak_broken: bool,
    /// The sale landed on a new streak day (start, extension or restart).
    pub extended: bool,
}

impl StreakUpdate {
    /// Milestone equal to the new current streak, when the sale reached one.
    pub fn milestone_reached(&self) -> Option<u32> {
        if !self.extended {
            return None;
        }
        STREAK_MILESTONES
            .iter()
            .copied()
            .find(|milestone| *milestone == self.state.current)
    }
}

impl StreakState {
    /// Apply a qualifying sale made on `sale_day`.
    ///
    /// - no previous sale: streak starts at 1
    /// - same day, or a back-dated day: unchanged
    /// - the next day: streak + 1
    /// - any later day: streak restarts at 1
    pub fn advance(self, sale_day: NaiveDate) -> StreakUpdate {
        let Some(last) = self.last_sale_day else {
            return self.with_current(1, sale_day, false, true);
        };

        if sale_day <= last {
            return StreakUpdate {
                state: self,
                streak_broken: false,
                extended: false,
            };
        }

        if last.checked_add_days(Days::new(1)) == Some(sale_day) {
            let next = self.current.saturating_add(1).max(1);
            self.with_current(next, sale_day, false, true)
        } else {
            let broken = self.current > 0;
            self.with_current(1, sale_day, broken, true)
        }
    }

    fn with_current(
        self,
        current: u32,
        sale_day: NaiveDate,
        streak_broken: bool,
        extended: bool,
    ) -> StreakUpdate {
        StreakUpdate {
            state: Self {
                current,
                longest: self.longest.max(current),
                last_sale_day: Some(sale_day),
            },
            streak_broken,
            extended,
        }
    }

    /// Streak as displayed on `today`: a streak whose last sale is older than
    /// yesterday has already lapsed.
    pub fn current_as_of(&self, today: NaiveDate) -> u32 {
        match self.last_sale_day {
            Some(last) if last >= today.checked_sub_days(Days::new(1)).unwrap_or(today) => {
                self.current
            }
            _ => 0,
        }
    }
}
