use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching the plan status.
///
/// None of these abort a scrape: the collector logs them and falls back to a
/// zero-valued status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("building request to {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("issuing request to {url}: {source}")]
    Upstream { url: String, source: reqwest::Error },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("reading response from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Classifies a `send()` failure as either a construction or transport error.
    pub(crate) fn from_send(url: &str, source: reqwest::Error) -> Self {
        if source.is_builder() {
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::Upstream {
                url: url.to_string(),
                source,
            }
        }
    }
}
