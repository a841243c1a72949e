use async_trait::async_trait;
use celebmatch_core::{FetchError, PostFetcher};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout for timeline calls.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tweets requested per timeline page, the platform maximum.
const PAGE_SIZE: usize = 200;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

/// One status from the timeline endpoint. `full_text` requires
/// `tweet_mode=extended`, otherwise the API truncates the body.
#[derive(Debug, Deserialize)]
struct TimelineTweet {
    id: u64,
    full_text: String,
}

/// Bearer-token Twitter timeline client.
///
/// Pages backwards through `statuses/user_timeline` with `max_id` until an
/// empty page. Failures map to typed [`FetchError`]s; there is no retry
/// here, deliberately - the matcher treats every fetch outcome as final.
pub struct TwitterClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(bearer_token: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: bearer_token.into(),
        })
    }

    /// Point the client at a different API root (tests, mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(
        &self,
        handle: &str,
        max_id: Option<u64>,
    ) -> Result<Vec<TimelineTweet>, FetchError> {
        let url = format!("{}/statuses/user_timeline.json", self.base_url);
        let count = PAGE_SIZE.to_string();
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("screen_name", handle),
                ("count", count.as_str()),
                ("tweet_mode", "extended"),
                ("trim_user", "true"),
            ]);
        if let Some(id) = max_id {
            let id = id.to_string();
            request = request.query(&[("max_id", id.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(handle, status.as_u16(), retry_after, body));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Network(format!("bad timeline body: {e}")))
    }
}

/// Map a non-success timeline status code to a typed failure.
fn map_error_status(
    handle: &str,
    status: u16,
    retry_after: Option<u64>,
    body: String,
) -> FetchError {
    match status {
        404 => FetchError::UserNotFound(handle.to_string()),
        429 => FetchError::RateLimited { retry_after },
        _ => FetchError::Api {
            status,
            message: body,
        },
    }
}

#[async_trait]
impl PostFetcher for TwitterClient {
    async fn fetch_posts(&self, handle: &str) -> Result<Vec<String>, FetchError> {
        info!(handle, "fetching timeline");
        let mut posts = Vec::new();
        let mut max_id: Option<u64> = None;

        loop {
            let page = self.fetch_page(handle, max_id).await?;
            if page.is_empty() {
                break;
            }
            debug!(
                handle,
                page = page.len(),
                total = posts.len() + page.len(),
                "timeline page fetched"
            );

            // Next page ends just before the oldest tweet seen so far.
            max_id = page.last().map(|tweet| tweet.id.saturating_sub(1));
            posts.extend(page.into_iter().map(|tweet| tweet.full_text));
        }

        info!(handle, posts = posts.len(), "timeline fetched");
        Ok(posts)
    }
}
