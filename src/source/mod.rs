//! Where restaurant details come from.

pub mod error;
pub mod http;
pub mod yelp;

use async_trait::async_trait;

use crate::model::{Rating, RestaurantDetail, RestaurantId};

pub use error::{FetchError, RatingError};
pub use http::{HttpDetailSource, HttpSourceConfig};
pub use yelp::{YelpCredentials, YelpRatingSource};

/// Anything able to fetch the extended details of one restaurant entry.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch(&self, id: &RestaurantId) -> Result<RestaurantDetail, FetchError>;
}

/// Looks up a restaurant's public rating by name and location.
#[async_trait]
pub trait RatingSource: Send + Sync {
    async fn rating(&self, term: &str, location: &str) -> Result<Rating, RatingError>;
}
