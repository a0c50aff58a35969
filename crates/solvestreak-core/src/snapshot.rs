//! Display projection of the history record.
//!
//! [`Snapshot::build`] is a pure function of the record, the current time
//! and the display settings, so the pipeline can call it before the network
//! round (last-known values) and again afterwards.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::history::HistoryRecord;
use crate::platform::{Platform, PlatformCounts};
use crate::storage::DisplayConfig;
use crate::streak::BREAK_WINDOW;

/// Whether the fire icon is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireState {
    /// Activity within the last 24 hours.
    Active,
    Idle,
}

impl FireState {
    pub fn is_active(&self) -> bool {
        matches!(self, FireState::Active)
    }

    pub fn streak_color<'a>(&self, display: &'a DisplayConfig) -> &'a str {
        match self {
            FireState::Active => &display.accent_color,
            FireState::Idle => &display.muted_color,
        }
    }

    pub fn image<'a>(&self, display: &'a DisplayConfig) -> &'a str {
        match self {
            FireState::Active => &display.fire_on_image,
            FireState::Idle => &display.fire_off_image,
        }
    }
}

/// One weekday cell of the activity strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub active: bool,
    pub color: String,
}

/// Fully populated widget payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub streak: u32,
    pub total_solved: u64,
    pub counts: PlatformCounts,
    pub fire: FireState,
    pub fire_image: String,
    pub streak_color: String,
    /// Current calendar week, Monday first.
    pub week: [DayCell; 7],
}

impl Snapshot {
    pub fn build<Tz: TimeZone>(
        record: &HistoryRecord,
        now: &DateTime<Tz>,
        display: &DisplayConfig,
    ) -> Self {
        let fire = fire_state(record.last_activity_timestamp, now.with_timezone(&Utc));
        let week = current_week(now.date_naive()).map(|date| {
            let active = record.is_active_on(date);
            let color = if active {
                display.day_active_color.clone()
            } else {
                display.day_inactive_color.clone()
            };
            DayCell { date, active, color }
        });

        Self {
            streak: record.streak,
            total_solved: record.last_total(),
            counts: record.counts(),
            fire,
            fire_image: fire.image(display).to_string(),
            streak_color: fire.streak_color(display).to_string(),
            week,
        }
    }

    /// Ordered `key=value` pairs shared by the snapshot file and the stdout line.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("Streak".to_string(), self.streak.to_string()),
            ("TotalSolved".to_string(), self.total_solved.to_string()),
        ];
        for platform in Platform::ALL {
            fields.push((
                platform.snapshot_key().to_string(),
                self.counts.get(platform).to_string(),
            ));
        }
        fields.push(("FireImg".to_string(), self.fire_image.clone()));
        fields.push(("StreakColor".to_string(), self.streak_color.clone()));
        for (i, day) in self.week.iter().enumerate() {
            fields.push((format!("Day{}Color", i + 1), day.color.clone()));
        }
        fields
    }

    /// Payload for `stats.json`.
    pub fn structured(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        payload.insert("streak".into(), self.streak.into());
        payload.insert("total_solved".into(), self.total_solved.into());
        for platform in Platform::ALL {
            payload.insert(
                platform.structured_key().into(),
                self.counts.get(platform).into(),
            );
        }
        payload.insert("fire_on".into(), self.fire.is_active().into());
        payload.insert("fire_img".into(), self.fire_image.clone().into());
        serde_json::Value::Object(payload)
    }
}

fn fire_state(last_activity: Option<DateTime<Utc>>, now: DateTime<Utc>) -> FireState {
    match last_activity {
        Some(ts) if now.signed_duration_since(ts) < BREAK_WINDOW => FireState::Active,
        _ => FireState::Idle,
    }
}

/// Monday..Sunday of the week containing `today`.
fn current_week(today: NaiveDate) -> [NaiveDate; 7] {
    let monday = today - TimeDelta::days(i64::from(today.weekday().num_days_from_monday()));
    std::array::from_fn(|i| monday + TimeDelta::days(i as i64))
}
