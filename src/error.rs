use thiserror::Error;

/// Failures reaching the catalog source: transport errors, bad HTTP status,
/// rejected credentials, or a response the feed decoder can't make sense of.
#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Catalog endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Not authorised: {0}")]
    Unauthorised(String),

    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
