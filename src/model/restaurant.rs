use std::fmt;

// ---------------------------------------------------------------------------
// RestaurantId: newtype for the request key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RestaurantId(pub String);

impl RestaurantId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RestaurantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RestaurantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RestaurantSummary: an entry already present on the listing page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantSummary {
    pub id: RestaurantId,
    pub name: String,
    /// Link target followed when the entry's default action is not suppressed.
    pub href: Option<String>,
}

impl RestaurantSummary {
    pub fn new(id: impl Into<RestaurantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}
