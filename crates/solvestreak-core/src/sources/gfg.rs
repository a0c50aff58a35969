//! GeeksforGeeks adapter.
//!
//! GeeksforGeeks has no public API, so this tries the profile page first and
//! falls back to a third-party stats-card mirror. Both are scanned for the
//! "Problem Solved" figure; the mirror can also be summed per difficulty.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use url::Url;

use super::{http_client, identity_configured, FetchError, SolvedCountSource};
use crate::platform::Platform;

const DIFFICULTY_LABELS: [&str; 5] = ["School", "Basic", "Easy", "Medium", "Hard"];

pub struct GfgSource {
    username: String,
    profile_base_url: String,
    mirror_base_url: String,
    profile_timeout: Duration,
    mirror_timeout: Duration,
}

impl GfgSource {
    pub fn new(
        username: &str,
        profile_base_url: &str,
        mirror_base_url: &str,
        profile_timeout: Duration,
        mirror_timeout: Duration,
    ) -> Self {
        Self {
            username: username.trim().to_string(),
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
            mirror_base_url: mirror_base_url.trim_end_matches('/').to_string(),
            profile_timeout,
            mirror_timeout,
        }
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let resp = http_client(timeout)?
            .get(url)
            .header("Accept", "text/html,image/svg+xml,*/*")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }
        Ok(resp.text().await?)
    }

    async fn from_profile(&self) -> Result<u64, FetchError> {
        let url = format!(
            "{}/user/{}/",
            self.profile_base_url,
            urlencoding::encode(&self.username)
        );
        let html = self.get_text(&url, self.profile_timeout).await?;
        parse_profile(&html)
            .ok_or_else(|| FetchError::Parse("no solved count on profile page".into()))
    }

    async fn from_mirror(&self) -> Result<u64, FetchError> {
        let url = Url::parse_with_params(
            &format!("{}/", self.mirror_base_url),
            &[("username", self.username.as_str())],
        )
        .map_err(|e| FetchError::Parse(format!("bad mirror URL: {e}")))?;
        let svg = self.get_text(url.as_str(), self.mirror_timeout).await?;
        parse_stats_card(&svg).ok_or_else(|| FetchError::Parse("no solved count on stats card".into()))
    }
}

#[async_trait]
impl SolvedCountSource for GfgSource {
    fn platform(&self) -> Platform {
        Platform::Gfg
    }

    async fn fetch_solved_count(&self) -> Option<u64> {
        if !identity_configured(&self.username) {
            tracing::warn!("GFG username not configured, skipping fetch");
            return None;
        }
        tracing::info!(user = %self.username, "fetching GFG stats");

        match self.from_profile().await {
            Ok(count) => return Some(count),
            Err(err) => {
                tracing::warn!(user = %self.username, error = %err, "GFG profile scrape failed, trying mirror");
            }
        }

        match self.from_mirror().await {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(user = %self.username, error = %err, "GFG mirror fetch failed");
                None
            }
        }
    }
}

// `[0-9]` rather than `\d` so non-ASCII digits never reach `parse`.
static PROFILE_SOLVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)problem solved.*?([0-9]+)\s*<").expect("Invalid profile solved regex")
});

static CARD_SOLVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)problem solved.*?>([0-9]+)<").expect("Invalid card solved regex")
});

static CARD_DIFFICULTIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DIFFICULTY_LABELS
        .iter()
        .map(|label| {
            Regex::new(&format!(r"(?is){}.*?>([0-9]+)<", regex::escape(label)))
                .expect("Invalid difficulty regex")
        })
        .collect()
});

/// Profile page: first digit run after "Problem Solved" that is followed by
/// optional whitespace and a `<`.
pub fn parse_profile(html: &str) -> Option<u64> {
    first_count(&PROFILE_SOLVED, html)
}

/// Stats card: the direct total, or the per-difficulty sum when that is positive.
pub fn parse_stats_card(svg: &str) -> Option<u64> {
    if let Some(total) = first_count(&CARD_SOLVED, svg) {
        return Some(total);
    }
    let sum: u64 = CARD_DIFFICULTIES
        .iter()
        .filter_map(|re| first_count(re, svg))
        .sum();
    (sum > 0).then_some(sum)
}

fn first_count(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
