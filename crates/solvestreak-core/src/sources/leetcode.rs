//! LeetCode adapter -- reads the accepted-submission total over GraphQL.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{http_client, identity_configured, FetchError, SolvedCountSource};
use crate::platform::Platform;

const SOLVED_QUERY: &str = r#"
query userProblemsSolved($username: String!) {
    allQuestionsCount {
        difficulty
        count
    }
    matchedUser(username: $username) {
        submitStats {
            acSubmissionNum {
                difficulty
                count
                submissions
            }
        }
    }
}
"#;

pub struct LeetCodeSource {
    username: String,
    base_url: String,
    timeout: Duration,
}

impl LeetCodeSource {
    pub fn new(username: &str, base_url: &str, timeout: Duration) -> Self {
        Self {
            username: username.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn try_fetch(&self) -> Result<u64, FetchError> {
        let client = http_client(self.timeout)?;
        let body = json!({
            "query": SOLVED_QUERY,
            "variables": { "username": self.username },
        });

        let resp = client
            .post(format!("{}/graphql", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let data: Value = resp.json().await?;
        parse_solved_count(&data)
    }
}

/// Pull the "All" accepted count out of a GraphQL response.
pub fn parse_solved_count(resp: &Value) -> Result<u64, FetchError> {
    if let Some(errors) = resp.get("errors").filter(|e| !e.is_null()) {
        return Err(FetchError::Api(errors.to_string()));
    }

    let data = resp
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| FetchError::Parse("missing data".into()))?;

    let stats = data
        .get("matchedUser")
        .and_then(|u| u.get("submitStats"))
        .filter(|s| s.is_object())
        .ok_or(FetchError::UserNotFound)?;

    stats
        .get("acSubmissionNum")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|item| item.get("difficulty").and_then(Value::as_str) == Some("All"))
        .and_then(|item| item.get("count"))
        .and_then(Value::as_u64)
        .ok_or_else(|| FetchError::Parse("no \"All\" entry in acSubmissionNum".into()))
}

#[async_trait]
impl SolvedCountSource for LeetCodeSource {
    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    async fn fetch_solved_count(&self) -> Option<u64> {
        if !identity_configured(&self.username) {
            tracing::warn!("LeetCode username not configured, skipping fetch");
            return None;
        }
        tracing::info!(user = %self.username, "fetching LeetCode stats");

        match self.try_fetch().await {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(user = %self.username, error = %err, "LeetCode fetch failed");
                None
            }
        }
    }
}
