/// Failure to turn a user-supplied URL into a comparable hostname.
///
/// The identity resolver recovers from this locally ("no match"); it never
/// crosses the resolver's public surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },
}

/// Failures while fetching or decoding the health feed.
///
/// `Clone` so that a single failed fetch can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("health feed request timed out: {0}")]
    Timeout(String),

    #[error("failed to reach health feed: {0}")]
    Transport(String),

    #[error("health feed responded with HTTP {0}")]
    UpstreamStatus(u16),

    #[error("failed to parse health feed: {0}")]
    Parse(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("health monitor has been torn down")]
    Closed,
}

impl From<reqwest::Error> for HealthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HealthError::Timeout(err.to_string())
        } else if err.is_decode() {
            HealthError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            HealthError::UpstreamStatus(status.as_u16())
        } else {
            HealthError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HealthError {
    fn from(err: serde_json::Error) -> Self {
        HealthError::Parse(err.to_string())
    }
}
