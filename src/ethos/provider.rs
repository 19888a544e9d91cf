use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// A reputation profile as returned by the score API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub score: i64,
}

/// Why a score lookup failed. Every remote or transport condition maps to
/// one of these; the fetcher never panics past its boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The API signalled the handle does not exist (404).
    #[error("User not found")]
    NotFound,
    /// Any other non-success response status.
    #[error("HTTP {}", .0.as_u16())]
    Http(StatusCode),
    /// Timeout, connection failure, or a malformed payload.
    #[error("{0}")]
    Transport(String),
}

/// Trait that every score source must implement.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// Look up the current reputation profile for a handle.
    async fn fetch_score(&self, handle: &str) -> Result<Profile, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
