use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::provider::{FetchError, Profile, ScoreSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
// The API rejects requests without a browser-looking user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Score source backed by the Ethos network API.
/// Docs: <https://developers.ethos.network/>
pub struct EthosApi {
    http: Client,
    /// Base URL ending at the lookup route, overridable in tests.
    base_url: String,
}

impl EthosApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EthosApi {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ScoreSource for EthosApi {
    fn name(&self) -> &str {
        "Ethos"
    }

    async fn fetch_score(&self, handle: &str) -> Result<Profile, FetchError> {
        let url = format!("{}/{}", self.base_url, handle);
        debug!("Fetching Ethos profile from {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(parse_profile(&raw, handle))
    }
}

/// Extract a profile from the response body, falling back to the queried
/// handle and neutral defaults for any missing field.
fn parse_profile(raw: &serde_json::Value, handle: &str) -> Profile {
    let score: i64 = raw["score"]
        .as_i64()
        .or_else(|| raw["score"].as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0);

    Profile {
        username: raw["username"].as_str().unwrap_or(handle).to_string(),
        display_name: raw["displayName"].as_str().unwrap_or("Unknown").to_string(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as AxStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    #[test]
    fn test_parse_profile_full() {
        let raw = serde_json::json!({
            "username": "alice",
            "displayName": "Alice A.",
            "score": 1850,
        });
        let p = parse_profile(&raw, "alice");
        assert_eq!(p.username, "alice");
        assert_eq!(p.display_name, "Alice A.");
        assert_eq!(p.score, 1850);
    }

    #[test]
    fn test_parse_profile_defaults() {
        let raw = serde_json::json!({});
        let p = parse_profile(&raw, "bob");
        assert_eq!(p.username, "bob");
        assert_eq!(p.display_name, "Unknown");
        assert_eq!(p.score, 0);
    }

    #[test]
    fn test_parse_profile_string_score() {
        let raw = serde_json::json!({ "score": "1234" });
        assert_eq!(parse_profile(&raw, "x").score, 1234);
    }

    async fn user_handler(Path(handle): Path<String>) -> axum::response::Response {
        match handle.as_str() {
            "alice" => Json(serde_json::json!({
                "username": "alice",
                "displayName": "Alice A.",
                "score": 1850,
            }))
            .into_response(),
            "garbled" => "definitely not json".into_response(),
            "boom" => (AxStatus::INTERNAL_SERVER_ERROR, "server error").into_response(),
            _ => (AxStatus::NOT_FOUND, "not found").into_response(),
        }
    }

    /// Serve a stub of the score API on an ephemeral local port and return
    /// the base URL to point `EthosApi` at.
    async fn spawn_stub_api() -> String {
        let app = Router::new().route("/user/by/x/:handle", get(user_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/user/by/x", addr)
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let api = EthosApi::new(&spawn_stub_api().await).unwrap();
        let profile = api.fetch_score("alice").await.unwrap();
        assert_eq!(profile.display_name, "Alice A.");
        assert_eq!(profile.score, 1850);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let api = EthosApi::new(&spawn_stub_api().await).unwrap();
        let err = api.fetch_score("nobody").await.unwrap_err();
        assert_eq!(err, FetchError::NotFound);
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_fetch_server_error_reports_code() {
        let api = EthosApi::new(&spawn_stub_api().await).unwrap();
        let err = api.fetch_score("boom").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_transport_error() {
        let api = EthosApi::new(&spawn_stub_api().await).unwrap();
        match api.fetch_score("garbled").await.unwrap_err() {
            FetchError::Transport(_) => {}
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        // Bind a port, then drop the listener so nothing is accepting.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = EthosApi::new(&format!("http://{}/user/by/x", addr)).unwrap();
        match api.fetch_score("alice").await.unwrap_err() {
            FetchError::Transport(_) => {}
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
