use reqwest::StatusCode;
use thiserror::Error as ThisError;

use super::IsRetryable;

/// Why a single fetch attempt did not produce counts.
///
/// These never leave the fetcher: they drive the retry loop and end up in logs.
#[derive(Debug, ThisError)]
pub enum FetchError {
    #[error("Invalid item URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Rate limited with status: {0}")]
    RateLimited(StatusCode),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Malformed listing body: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::RateLimited(status) | FetchError::UpstreamStatus(status) => Some(*status),
            FetchError::Transport(err) => err.status(),
            FetchError::InvalidUrl(_) | FetchError::Malformed(_) => None,
        }
    }
}

impl IsRetryable for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_)
            | FetchError::RateLimited(_)
            | FetchError::UpstreamStatus(_) => true,
            // A 200 with an unexpected shape will not improve on retry.
            FetchError::Malformed(_) | FetchError::InvalidUrl(_) => false,
        }
    }
}
