//! The persisted history record.
//!
//! The on-disk layout is a flat JSON object that older versions of the widget
//! script already produce. Every field carries a serde default so records
//! written by earlier versions load without a separate migration step, and
//! timestamps use unix seconds with `0` meaning "never".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::platform::{Platform, PlatformCounts};

/// Durable per-user state carried between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Consecutive active periods.
    #[serde(default)]
    pub streak: u32,

    #[serde(flatten)]
    counts: PlatformCounts,

    /// Always derived from `counts`; the stored value is ignored on load.
    #[serde(default)]
    last_total: u64,

    #[serde(default, rename = "last_date", with = "lenient_date")]
    pub last_active_date: Option<NaiveDate>,

    #[serde(default, rename = "daily_history", with = "daily_history")]
    pub daily_activity: BTreeMap<NaiveDate, bool>,

    #[serde(default, with = "unix_seconds")]
    pub last_activity_timestamp: Option<DateTime<Utc>>,

    #[serde(default, with = "unix_seconds")]
    pub last_streak_timestamp: Option<DateTime<Utc>>,
}

impl HistoryRecord {
    /// Record seeded with known counts, all other fields defaulted.
    pub fn with_counts(counts: PlatformCounts) -> Self {
        let mut record = Self {
            counts,
            ..Self::default()
        };
        record.normalize();
        record
    }

    pub fn counts(&self) -> PlatformCounts {
        self.counts
    }

    pub fn count(&self, platform: Platform) -> u64 {
        self.counts.get(platform)
    }

    pub fn last_total(&self) -> u64 {
        self.last_total
    }

    /// Raise the floor for `platform` to `value`. Lower values are ignored.
    ///
    /// Returns true when the stored count changed.
    pub fn raise_count(&mut self, platform: Platform, value: u64) -> bool {
        if value <= self.counts.get(platform) {
            return false;
        }
        self.counts.set(platform, value);
        self.last_total = self.counts.total();
        true
    }

    /// Whether `date` has been marked active.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.daily_activity.get(&date).copied().unwrap_or(false)
    }

    /// Re-establish derived fields after deserialization.
    pub(crate) fn normalize(&mut self) {
        self.last_total = self.counts.total();
        if self.streak == 0 {
            self.last_streak_timestamp = None;
        }
    }
}

/// Unix seconds (integer or float), `0`/`null` read as absent, absent written as `0`.
mod unix_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => {
                let secs = ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_micros()) / 1e6;
                serializer.serialize_f64(secs)
            }
            None => serializer.serialize_u64(0),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.and_then(from_secs))
    }

    pub(super) fn from_secs(secs: f64) -> Option<DateTime<Utc>> {
        if !secs.is_finite() || secs <= 0.0 {
            return None;
        }
        let whole = secs.trunc();
        let micros = ((secs - whole) * 1e6).round() as u32;
        DateTime::from_timestamp(whole as i64, micros.min(999_999) * 1_000)
    }
}

/// `YYYY-MM-DD` string or null; anything unparseable reads as absent.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }
}

/// Date-keyed activity map; entries with malformed keys or non-boolean values are dropped.
mod daily_history {
    use chrono::NaiveDate;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(value: &BTreeMap<NaiveDate, bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (date, active) in value {
            map.serialize_entry(&date.format("%Y-%m-%d").to_string(), active)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| {
                let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").ok()?;
                Some((date, value.as_bool()?))
            })
            .collect())
    }
}
