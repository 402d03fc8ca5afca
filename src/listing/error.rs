use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ListingError {
    #[error("listing not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid listing {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("No restaurants found in {0}")]
    Empty(PathBuf),
}
