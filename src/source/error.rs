#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request never completed (connect, DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body does not match the expected detail payload.
    #[error("malformed detail payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum RatingError {
    #[error("no Yelp credentials: set ACCESS_TOKEN, or CLIENT_ID and CLIENT_SECRET")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed rating response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The search succeeded but returned no business.
    #[error("no business matches {term:?} near {location:?}")]
    NoMatch { term: String, location: String },
}
