//! HTTP detail source for the show-more endpoint.
//!
//! Issues `GET {server}{endpoint}?name=<id>` using [`reqwest`] and decodes
//! the JSON body into a [`RestaurantDetail`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::model::{RestaurantDetail, RestaurantId};

use super::{DetailSource, FetchError};

pub const DEFAULT_SERVER: &str = "http://localhost:5000";
pub const DEFAULT_ENDPOINT: &str = "/show-more";
/// Query parameter carrying the entry identifier.
pub const ID_PARAM: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Base URL, e.g. `http://localhost:5000`.
    pub server: String,
    /// Path of the show-more endpoint, e.g. `/show-more`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HttpSourceConfig {
    /// Full endpoint URL with exactly one slash between server and path.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.server.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

/// HTTP client for one show-more endpoint.
pub struct HttpDetailSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDetailSource {
    pub fn new(config: &HttpSourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &HttpSourceConfig) -> Self {
        Self {
            client,
            url: config.url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DetailSource for HttpDetailSource {
    async fn fetch(&self, id: &RestaurantId) -> Result<RestaurantDetail, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[(ID_PARAM, id.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(id = id.as_str(), status = status.as_u16(), bytes = body.len(), "detail response");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        RestaurantDetail::from_json(&body).map_err(FetchError::Malformed)
    }
}
