use hyper::StatusCode;
use thiserror::Error;

/// Failures of the OAuth 1.0a handshake legs.
///
/// None of these surface to the client: the profile handlers absorb them,
/// log, and render the unlinked state or redirect as usual.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider returned HTTP {0}")]
    Status(StatusCode),
    #[error("Provider response missing `{0}`")]
    MissingField(&'static str),
    #[error("Datastore error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
