//! Yelp rating lookup.
//!
//! Searches `GET {api}/v3/businesses/search?term=..&location=..&limit=1` with a
//! bearer token and reads the rating of the first business. The token is
//! either taken as given or exchanged once from client credentials at
//! `{api}/oauth2/token`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::model::Rating;

use super::{RatingError, RatingSource};

pub const YELP_API: &str = "https://api.yelp.com";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

const TOKEN_PATH: &str = "oauth2/token";
const SEARCH_PATH: &str = "v3/businesses/search";

#[derive(Clone, PartialEq, Eq)]
pub enum YelpCredentials {
    AccessToken(String),
    Client { id: String, secret: String },
}

impl YelpCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, RatingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `ACCESS_TOKEN` wins; otherwise both `CLIENT_ID` and `CLIENT_SECRET`
    /// are required. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RatingError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(token) = get(ACCESS_TOKEN_VAR) {
            return Ok(Self::AccessToken(token));
        }
        match (get(CLIENT_ID_VAR), get(CLIENT_SECRET_VAR)) {
            (Some(id), Some(secret)) => Ok(Self::Client { id, secret }),
            _ => Err(RatingError::MissingCredentials),
        }
    }
}

// Secrets stay out of logs
impl fmt::Debug for YelpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken(..)"),
            Self::Client { id, .. } => f
                .debug_struct("Client")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    businesses: Vec<Business>,
}

#[derive(Deserialize)]
struct Business {
    rating: Rating,
}

pub struct YelpRatingSource {
    client: reqwest::Client,
    api: String,
    credentials: YelpCredentials,
    token: OnceCell<String>,
}

impl YelpRatingSource {
    pub fn new(credentials: YelpCredentials, timeout: Duration) -> Result<Self, RatingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, YELP_API, credentials))
    }

    /// Point at another API root, e.g. a local server.
    pub fn with_client(
        client: reqwest::Client,
        api: impl Into<String>,
        credentials: YelpCredentials,
    ) -> Self {
        Self {
            client,
            api: api.into(),
            credentials,
            token: OnceCell::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<&str, RatingError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                match &self.credentials {
                    YelpCredentials::AccessToken(token) => Ok(token.clone()),
                    YelpCredentials::Client { id, secret } => self.exchange(id, secret).await,
                }
            })
            .await?;
        Ok(token.as_str())
    }

    async fn exchange(&self, id: &str, secret: &str) -> Result<String, RatingError> {
        let response = self
            .client
            .post(self.endpoint(TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", id),
                ("client_secret", secret),
            ])
            .send()
            .await?;
        let body = success_body(response).await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(RatingError::Malformed)?;
        debug!("exchanged client credentials for an access token");
        Ok(token.access_token)
    }
}

async fn success_body(response: reqwest::Response) -> Result<String, RatingError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RatingError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl RatingSource for YelpRatingSource {
    async fn rating(&self, term: &str, location: &str) -> Result<Rating, RatingError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.endpoint(SEARCH_PATH))
            .bearer_auth(token)
            .query(&[("term", term), ("location", location), ("limit", "1")])
            .send()
            .await?;
        let body = success_body(response).await?;
        let search: SearchResponse = serde_json::from_str(&body).map_err(RatingError::Malformed)?;

        let business = search
            .businesses
            .into_iter()
            .next()
            .ok_or_else(|| RatingError::NoMatch {
                term: term.to_string(),
                location: location.to_string(),
            })?;
        debug!(term, location, rating = business.rating.0, "yelp rating");
        Ok(business.rating)
    }
}
