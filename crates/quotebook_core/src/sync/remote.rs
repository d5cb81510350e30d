//! Remote quote endpoint.
//!
//! The endpoint is a generic REST resource: `GET` returns a list of posts
//! carrying at least a `title`, `POST` echoes the submitted quote.

use crate::model::quote::{Quote, SERVER_CATEGORY};
use crate::sync::error::{SyncError, SyncResult};
use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Placeholder REST resource used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Number of remote posts mapped into quotes per fetch.
pub const DEFAULT_FETCH_LIMIT: usize = 10;

/// Port for the remote side of synchronization.
#[async_trait]
pub trait RemoteQuoteSource: Send + Sync {
    /// Fetches the remote snapshot, already mapped into quotes.
    async fn fetch_quotes(&self) -> SyncResult<Vec<Quote>>;

    /// Pushes one quote; returns the echoed response body.
    async fn push_quote(&self, quote: &Quote) -> SyncResult<Value>;
}

/// HTTP adapter for [`RemoteQuoteSource`].
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
    fetch_limit: usize,
}

impl HttpQuoteSource {
    pub fn new(endpoint: &str, timeout: Duration, fetch_limit: usize) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            fetch_limit,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn parse_response(response: reqwest::Response) -> SyncResult<Value> {
        let status = response.status();
        let body = response.text().await?;
        debug!("event=remote_response module=sync status_code={status} bytes={}", body.len());

        if !status.is_success() {
            return Err(SyncError::api(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|err| {
            error!(
                "event=remote_response module=sync status=error error_code=bad_json error={err}"
            );
            SyncError::Json(err)
        })
    }
}

#[async_trait]
impl RemoteQuoteSource for HttpQuoteSource {
    async fn fetch_quotes(&self) -> SyncResult<Vec<Quote>> {
        let response = self.client.get(&self.endpoint).send().await?;
        let body = Self::parse_response(response).await?;
        posts_to_quotes(&body, self.fetch_limit)
    }

    async fn push_quote(&self, quote: &Quote) -> SyncResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(quote)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

/// Maps a remote post list into server quotes.
///
/// Posts without a non-empty string `title` are skipped. At most `limit`
/// quotes are returned.
///
/// # Errors
/// - `SyncError::Json` when the body is not an array.
pub fn posts_to_quotes(body: &Value, limit: usize) -> SyncResult<Vec<Quote>> {
    let posts = Vec::<Value>::deserialize(body).map_err(|err| {
        error!("event=remote_response module=sync status=error error_code=not_a_list error={err}");
        SyncError::Json(err)
    })?;

    Ok(posts
        .iter()
        .filter_map(|post| post.get("title").and_then(Value::as_str))
        .filter(|title| !title.is_empty())
        .take(limit)
        .map(|title| Quote::unchecked(title, SERVER_CATEGORY))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{posts_to_quotes, HttpQuoteSource};
    use crate::model::quote::Quote;
    use crate::sync::error::SyncError;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn posts_map_titles_into_server_quotes() {
        let body = json!([
            {"userId": 1, "id": 1, "title": "New thought", "body": "ignored"},
            {"id": 2, "body": "no title"},
            {"id": 3, "title": ""},
            {"id": 4, "title": "Second thought"}
        ]);
        assert_eq!(
            posts_to_quotes(&body, 10).unwrap(),
            vec![
                Quote::unchecked("New thought", "Server"),
                Quote::unchecked("Second thought", "Server"),
            ]
        );
    }

    #[test]
    fn posts_respect_limit() {
        let body = json!([{"title": "a"}, {"title": "b"}, {"title": "c"}]);
        assert_eq!(posts_to_quotes(&body, 2).unwrap().len(), 2);
    }

    #[test]
    fn non_array_body_is_a_json_error() {
        let result = posts_to_quotes(&json!({"error": "rate limited"}), 10);
        assert!(matches!(result, Err(SyncError::Json(_))));
        assert!(posts_to_quotes(&json!("plain"), 10).is_err());
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let source = HttpQuoteSource::new("https://example.com/posts/", Duration::from_secs(1), 5)
            .expect("client should build");
        assert_eq!(source.endpoint(), "https://example.com/posts");
    }
}
