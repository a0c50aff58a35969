//! Tracked coding-practice platforms and per-platform counters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coding-practice site exposed only through its solved-problem counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    LeetCode,
    Gfg,
}

impl Platform {
    /// Every tracked platform, in output order.
    pub const ALL: [Platform; 2] = [Platform::LeetCode, Platform::Gfg];

    /// Short identifier used in log fields.
    pub fn id(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::Gfg => "gfg",
        }
    }

    /// Key used in the `[Variables]` snapshot and the stdout line.
    pub fn snapshot_key(&self) -> &'static str {
        match self {
            Platform::LeetCode => "LC_Count",
            Platform::Gfg => "GFG_Count",
        }
    }

    /// Key used in `stats.json`.
    pub fn structured_key(&self) -> &'static str {
        match self {
            Platform::LeetCode => "lc_count",
            Platform::Gfg => "gfg_count",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::LeetCode => "LeetCode",
            Platform::Gfg => "GeeksforGeeks",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Highest confirmed solved count per platform.
///
/// Field names match the persisted history layout, so this struct is
/// flattened straight into [`crate::HistoryRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCounts {
    #[serde(default, rename = "last_lc_total")]
    pub leetcode: u64,
    #[serde(default, rename = "last_gfg_total")]
    pub gfg: u64,
}

impl PlatformCounts {
    pub fn new(leetcode: u64, gfg: u64) -> Self {
        Self { leetcode, gfg }
    }

    pub fn get(&self, platform: Platform) -> u64 {
        match platform {
            Platform::LeetCode => self.leetcode,
            Platform::Gfg => self.gfg,
        }
    }

    pub fn set(&mut self, platform: Platform, value: u64) {
        match platform {
            Platform::LeetCode => self.leetcode = value,
            Platform::Gfg => self.gfg = value,
        }
    }

    pub fn total(&self) -> u64 {
        Platform::ALL
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(self.get(*p)))
    }
}

/// Results of one polling round: `None` means the source was unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    pub leetcode: Option<u64>,
    pub gfg: Option<u64>,
}

impl Observation {
    pub fn new(leetcode: Option<u64>, gfg: Option<u64>) -> Self {
        Self { leetcode, gfg }
    }

    pub fn get(&self, platform: Platform) -> Option<u64> {
        match platform {
            Platform::LeetCode => self.leetcode,
            Platform::Gfg => self.gfg,
        }
    }

    pub fn set(&mut self, platform: Platform, value: Option<u64>) {
        match platform {
            Platform::LeetCode => self.leetcode = value,
            Platform::Gfg => self.gfg = value,
        }
    }

    /// True when no source produced a value.
    pub fn is_empty(&self) -> bool {
        Platform::ALL.iter().all(|p| self.get(*p).is_none())
    }
}
