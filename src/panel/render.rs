//! Turning a detail payload into region content.

use crate::model::{RestaurantDetail, Review};
use crate::page::{Fragment, Region};

/// Display height of every photo, in pixels.
pub const PHOTO_HEIGHT: u32 = 300;

pub fn review_fragment(review: &Review) -> Fragment {
    Fragment::ReviewLine {
        rating: review.rating.to_string(),
        text: review.text.clone(),
    }
}

pub fn photo_fragment(url: &str) -> Fragment {
    Fragment::Image {
        src: url.to_string(),
        height: PHOTO_HEIGHT,
    }
}

/// Clear both regions, then append one fragment per review and per photo,
/// in payload order.
pub fn render_detail(detail: &RestaurantDetail, reviews: &mut Region, photos: &mut Region) {
    reviews.empty();
    photos.empty();

    for review in &detail.reviews {
        reviews.append(review_fragment(review));
    }
    for url in &detail.photos {
        photos.append(photo_fragment(url));
    }
}
