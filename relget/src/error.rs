use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Invalid repository identifier '{0}'")]
    InvalidRepository(String),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid asset name '{0}': must be a plain file name")]
    InvalidAssetName(String),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to decode release metadata: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
