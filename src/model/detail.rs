//! Extended restaurant details as returned by the show-more endpoint.
//!
//! Decoding is strict: `status`, `name`, `reviews` and `photos` must be
//! present with the right shape, otherwise the payload is rejected as
//! malformed. `menu` is optional and kept opaque.

use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// RestaurantDetail: the fetched payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestaurantDetail {
    pub status: ResponseStatus,
    pub name: String,
    pub reviews: Vec<Review>,
    pub photos: Vec<String>,
    #[serde(default)]
    pub menu: Menu,
}

impl RestaurantDetail {
    /// Decode a JSON response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub rating: Rating,
    pub text: String,
}

impl Review {
    pub fn new(rating: f64, text: impl Into<String>) -> Self {
        Self {
            rating: Rating(rating),
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rating: a JSON number, printed the way the page prints numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Rating(pub f64);

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        // Exponent form outside [1e-6, 1e21), with an explicit sign: 1e+21, 1.5e-7
        if v.is_finite() && v != 0.0 && !(1e-6..1e21).contains(&v.abs()) {
            let exp = format!("{v:e}");
            return match exp.split_once('e') {
                Some((mantissa, power)) if !power.starts_with('-') => {
                    write!(f, "{mantissa}e+{power}")
                }
                _ => f.write_str(&exp),
            };
        }
        // Whole numbers print without a trailing ".0": 5, not 5.0
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
            write!(f, "{}", v as i64)
        } else {
            write!(f, "{v}")
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseStatus: string or numeric code, diagnostic only
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseStatus {
    Text(String),
    Code(serde_json::Number),
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Code(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ResponseStatus {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Menu: received, carried, never rendered
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Menu(pub serde_json::Value);

impl Menu {
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}
