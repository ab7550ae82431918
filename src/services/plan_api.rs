use reqwest::Client;

use crate::{config::Config, error::FetchError, models::plan::PlanStatus};

/// Authenticated client for the plan status endpoint.
#[derive(Clone)]
pub struct PlanApiClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for PlanApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanApiClient")
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl PlanApiClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| FetchError::Request {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            url: config.api_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET with basic auth, no retries.
    pub async fn fetch_status(&self) -> Result<PlanStatus, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| FetchError::from_send(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}
