//! Error types for remote synchronization.

use crate::repo::slot_repo::RepoError;
use std::time::Duration;
use thiserror::Error;

pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status returned by the endpoint.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Merging the fetched snapshot failed locally.
    #[error("storage error: {0}")]
    Repo(#[from] RepoError),
}

impl SyncError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
