//! Object store access over HTTPS
//!
//! [`ObjectStore`] is the seam between ingestion and the network: listing
//! plus single-attempt reads. [`GcsStore`] implements it against a public
//! Google Cloud Storage bucket, and [`fetch_with_retry`] layers the retry
//! schedule on top so tests can script failures through a mock store.

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Fetch failure, classified by whether a retry can help.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Timeouts, dropped connections, throttling and server-side errors.
    /// Worth retrying.
    #[error("transient fetch failure: {reason}")]
    Transient { reason: String },

    /// Anything a retry cannot fix, such as a missing object or a
    /// malformed request.
    #[error("fatal fetch failure: {reason}")]
    Fatal { reason: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode, url: &str) -> Self {
        let reason = format!("HTTP {status} for {url}");
        match status.as_u16() {
            429 | 500 | 502 | 503 | 504 => FetchError::Transient { reason },
            _ => FetchError::Fatal { reason },
        }
    }

    /// Classify a transport-level error from the HTTP client.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let reason = err.to_string();
        if err.is_timeout() || err.is_connect() || err.is_body() || err.is_decode() {
            FetchError::Transient { reason }
        } else {
            FetchError::Fatal { reason }
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A listable blob store holding the document corpus.
///
/// Implementations make single attempts only; retry scheduling lives in
/// [`fetch_with_retry`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of every object under the prefix.
    async fn list_objects(&self, prefix: &str) -> FetchResult<Vec<String>>;

    /// Raw bytes of one object.
    async fn get_object(&self, name: &str) -> FetchResult<Bytes>;
}

/// Retry schedule for document fetches: a fixed attempt budget with
/// exponential backoff between tries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, counting the first. A budget of zero still makes
    /// one attempt.
    pub max_attempts: u32,
    /// Sleep before the second attempt. Doubles after every failure.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// Fetch one object, retrying transient failures per the policy.
///
/// Fatal errors surface immediately without another attempt. When the
/// budget runs out, the last transient error is returned. Only the calling
/// task sleeps between attempts.
pub async fn fetch_with_retry(
    store: &dyn ObjectStore,
    name: &str,
    policy: &RetryPolicy,
) -> FetchResult<Bytes> {
    let mut backoff = policy.initial_backoff;
    let mut attempt: u32 = 1;
    loop {
        match store.get_object(name).await {
            Ok(bytes) => return Ok(bytes),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                debug!(
                    object = %name,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Transient fetch failure, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Public Google Cloud Storage bucket over plain HTTPS.
///
/// Listing goes through the JSON API (`storage/v1/b/{bucket}/o`) with
/// `pageToken` pagination; object reads use the media endpoint
/// (`{endpoint}/{bucket}/{name}`). No credentials are attached, so the
/// bucket must be publicly readable.
pub struct GcsStore {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl GcsStore {
    /// Create a store for the bucket with a 30 second request timeout.
    pub fn new(bucket: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Fatal {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            bucket: bucket.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Point the store at a different endpoint, e.g. a local fake server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn media_url(&self, name: &str) -> String {
        // Escape each path segment, keeping '/' separators readable.
        let path = name
            .split('/')
            .map(|segment| utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{}", self.endpoint, self.bucket, path)
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn list_objects(&self, prefix: &str) -> FetchResult<Vec<String>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ListPage {
            #[serde(default)]
            items: Vec<ObjectEntry>,
            next_page_token: Option<String>,
        }

        #[derive(Deserialize)]
        struct ObjectEntry {
            name: String,
        }

        let url = format!("{}/storage/v1/b/{}/o", self.endpoint, self.bucket);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).query(&[("prefix", prefix)]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await.map_err(FetchError::from_transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::from_status(status, &url));
            }

            let page: ListPage = response.json().await.map_err(FetchError::from_transport)?;
            names.extend(page.items.into_iter().map(|entry| entry.name));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(names),
            }
        }
    }

    async fn get_object(&self, name: &str) -> FetchResult<Bytes> {
        let url = self.media_url(name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status, &url));
        }

        response.bytes().await.map_err(FetchError::from_transport)
    }
}
