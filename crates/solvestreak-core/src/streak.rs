//! Elapsed-time activity streak.
//!
//! The streak follows two fixed windows rather than calendar days:
//!
//! - more than 24 hours without a confirmed solve breaks the streak, checked
//!   before any new activity is applied;
//! - after a break (or from zero) the first solve restarts the streak at 1;
//! - while the streak is alive it grows by one only when more than 15 hours
//!   have passed since it last grew.
//!
//! Histories already on disk depend on these exact windows, so they are not
//! aligned to midnight.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::history::HistoryRecord;
use crate::platform::{Observation, Platform};

/// Inactivity longer than this resets the streak to zero.
pub const BREAK_WINDOW: TimeDelta = TimeDelta::hours(24);

/// Minimum spacing between two streak increments.
pub const COOLDOWN_WINDOW: TimeDelta = TimeDelta::hours(15);

/// What a single run did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Streak went from 0 to 1.
    Started,
    /// Streak grew by one.
    Extended,
    /// New activity inside the cooldown window; streak unchanged.
    Cooldown,
    /// Streak expired and nothing new arrived.
    Broken,
    /// Nothing changed.
    Idle,
}

/// Summary of one engine step, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub streak_before: u32,
    pub streak_after: u32,
    /// The break window had elapsed when the run started.
    pub broke: bool,
    /// Platforms whose count rose this run.
    pub increased: Vec<Platform>,
    /// Calendar date the daily marker was written under.
    pub today: NaiveDate,
}

impl Transition {
    pub fn any_increase(&self) -> bool {
        !self.increased.is_empty()
    }
}

/// Pure state transition from (previous record, observation, now) to the next record.
#[derive(Debug, Clone, Copy)]
pub struct StreakEngine {
    break_window: TimeDelta,
    cooldown_window: TimeDelta,
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StreakEngine {
    pub fn new() -> Self {
        Self {
            break_window: BREAK_WINDOW,
            cooldown_window: COOLDOWN_WINDOW,
        }
    }

    /// Compute the next record.
    ///
    /// `now` carries the time zone used to pick the calendar date for the
    /// daily activity marker; all window arithmetic happens in UTC.
    pub fn apply<Tz: TimeZone>(
        &self,
        previous: &HistoryRecord,
        observation: &Observation,
        now: &DateTime<Tz>,
    ) -> (HistoryRecord, Transition) {
        let now_utc = now.with_timezone(&Utc);
        let today = now.date_naive();
        let mut next = previous.clone();
        let streak_before = previous.streak;

        let increased: Vec<Platform> = Platform::ALL
            .into_iter()
            .filter(|p| {
                observation
                    .get(*p)
                    .is_some_and(|count| count > previous.count(*p))
            })
            .collect();
        let any_increase = !increased.is_empty();

        let broke = exceeds(previous.last_activity_timestamp, now_utc, self.break_window);
        if broke {
            next.streak = 0;
            next.last_streak_timestamp = None;
        }

        let mut kind = if broke && streak_before > 0 {
            TransitionKind::Broken
        } else {
            TransitionKind::Idle
        };

        if any_increase {
            next.last_activity_timestamp = Some(now_utc);
            if next.streak == 0 {
                next.streak = 1;
                next.last_streak_timestamp = Some(now_utc);
                kind = TransitionKind::Started;
            } else if exceeds(next.last_streak_timestamp, now_utc, self.cooldown_window) {
                next.streak = next.streak.saturating_add(1);
                next.last_streak_timestamp = Some(now_utc);
                kind = TransitionKind::Extended;
            } else {
                kind = TransitionKind::Cooldown;
            }
        }

        for platform in &increased {
            if let Some(count) = observation.get(*platform) {
                next.raise_count(*platform, count);
            }
        }
        next.normalize();

        let active_today = next.is_active_on(today) || any_increase;
        next.daily_activity.insert(today, active_today);
        if active_today {
            next.last_active_date = Some(today);
        }

        let transition = Transition {
            kind,
            streak_before,
            streak_after: next.streak,
            broke: broke && streak_before > 0,
            increased,
            today,
        };
        (next, transition)
    }
}

/// True when more than `window` has elapsed since `since`; absent counts as forever.
fn exceeds(since: Option<DateTime<Utc>>, now: DateTime<Utc>, window: TimeDelta) -> bool {
    match since {
        Some(ts) => now.signed_duration_since(ts) > window,
        None => true,
    }
}
