//! Platform adapters that report a user's solved-problem count.

pub mod gfg;
pub mod leetcode;
pub mod traits;

pub use gfg::GfgSource;
pub use leetcode::LeetCodeSource;
pub use traits::SolvedCountSource;

use futures::future::join_all;
use std::time::Duration;

use crate::platform::Observation;
use crate::storage::Config;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Why a single fetch attempt produced no count.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("API reported errors: {0}")]
    Api(String),

    #[error("user not found")]
    UserNotFound,

    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Whether `identity` looks like a real username rather than a placeholder.
pub fn identity_configured(identity: &str) -> bool {
    let trimmed = identity.trim();
    !trimmed.is_empty() && !trimmed.starts_with("your_")
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Adapters for every configured platform.
pub fn sources_from_config(config: &Config) -> Vec<Box<dyn SolvedCountSource>> {
    vec![
        Box::new(LeetCodeSource::new(
            &config.leetcode_username,
            &config.endpoints.leetcode_base_url,
            config.timeouts.leetcode(),
        )),
        Box::new(GfgSource::new(
            &config.gfg_username,
            &config.endpoints.gfg_profile_base_url,
            &config.endpoints.gfg_mirror_base_url,
            config.timeouts.gfg_profile(),
            config.timeouts.gfg_mirror(),
        )),
    ]
}

/// Query every source concurrently and collect the results.
pub async fn fetch_all(sources: &[Box<dyn SolvedCountSource>]) -> Observation {
    let results = join_all(sources.iter().map(|source| async move {
        let platform = source.platform();
        let count = source.fetch_solved_count().await;
        match count {
            Some(n) => tracing::info!(platform = platform.id(), count = n, "fetched solved count"),
            None => tracing::warn!(platform = platform.id(), "no solved count this run"),
        }
        (platform, count)
    }))
    .await;

    let mut observation = Observation::default();
    for (platform, count) in results {
        observation.set(platform, count);
    }
    observation
}
