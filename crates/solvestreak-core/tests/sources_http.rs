//! Platform adapters against a local mock HTTP server.

use solvestreak_core::{GfgSource, LeetCodeSource, Platform, SolvedCountSource};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn leetcode_body(count: u64) -> String {
    serde_json::json!({
        "data": {
            "allQuestionsCount": [{"difficulty": "All", "count": 3000}],
            "matchedUser": {
                "submitStats": {
                    "acSubmissionNum": [
                        {"difficulty": "All", "count": count, "submissions": count + 10},
                        {"difficulty": "Easy", "count": 1, "submissions": 1}
                    ]
                }
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn leetcode_reads_all_count() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_body(mockito::Matcher::PartialJson(
            serde_json::json!({"variables": {"username": "alice"}}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(leetcode_body(250))
        .create_async()
        .await;

    let source = LeetCodeSource::new("alice", &server.url(), TIMEOUT);
    assert_eq!(source.platform(), Platform::LeetCode);
    assert_eq!(source.fetch_solved_count().await, Some(250));
    mock.assert_async().await;
}

#[tokio::test]
async fn leetcode_unknown_user_is_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"matchedUser": null}}"#)
        .create_async()
        .await;

    let source = LeetCodeSource::new("ghost", &server.url(), TIMEOUT);
    assert_eq!(source.fetch_solved_count().await, None);
}

#[tokio::test]
async fn leetcode_server_error_is_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/graphql")
        .with_status(503)
        .create_async()
        .await;

    let source = LeetCodeSource::new("alice", &server.url(), TIMEOUT);
    assert_eq!(source.fetch_solved_count().await, None);
}

#[tokio::test]
async fn leetcode_garbage_body_is_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body("<html>captcha</html>")
        .create_async()
        .await;

    let source = LeetCodeSource::new("alice", &server.url(), TIMEOUT);
    assert_eq!(source.fetch_solved_count().await, None);
}

#[tokio::test]
async fn unreachable_host_is_absent() {
    // Nothing listens on the discard port.
    let source = LeetCodeSource::new("alice", "http://127.0.0.1:9", Duration::from_secs(2));
    assert_eq!(source.fetch_solved_count().await, None);
}

#[tokio::test]
async fn gfg_profile_scrape_wins() {
    let mut server = mockito::Server::new_async().await;
    let profile = server
        .mock("GET", "/user/bob/")
        .with_status(200)
        .with_body(r#"<div>Problem Solved</div><div class="v">77</div>"#)
        .create_async()
        .await;
    let mirror = server
        .mock("GET", "/")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let url = server.url();
    let source = GfgSource::new("bob", &url, &url, TIMEOUT, TIMEOUT);
    assert_eq!(source.platform(), Platform::Gfg);
    assert_eq!(source.fetch_solved_count().await, Some(77));
    profile.assert_async().await;
    mirror.assert_async().await;
}

#[tokio::test]
async fn gfg_falls_back_to_mirror() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user/bob/")
        .with_status(404)
        .create_async()
        .await;
    let mirror = server
        .mock("GET", "/")
        .match_query(mockito::Matcher::UrlEncoded("username".into(), "bob".into()))
        .with_status(200)
        .with_body(r#"<svg><text>Easy</text><text>6</text><text>Medium</text><text>3</text></svg>"#)
        .create_async()
        .await;

    let url = server.url();
    let source = GfgSource::new("bob", &url, &url, TIMEOUT, TIMEOUT);
    assert_eq!(source.fetch_solved_count().await, Some(9));
    mirror.assert_async().await;
}

#[tokio::test]
async fn gfg_both_strategies_fail_is_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user/bob/")
        .with_status(200)
        .with_body("<html>redesigned page</html>")
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let url = server.url();
    let source = GfgSource::new("bob", &url, &url, TIMEOUT, TIMEOUT);
    assert_eq!(source.fetch_solved_count().await, None);
}
