//! Cached, rate-limited fetching of web resources
//!
//! The `Fetcher` answers from the `CacheStore` when it can. On a miss it waits
//! the configured minimum delay, performs one live request through its
//! `Transport`, persists the body and returns it.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{CacheError, CacheStore};

/// Default pause before every live request
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);

/// Default timeout for a single live request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every live request
const USER_AGENT: &str = concat!("npsites/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching a resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    /// The response could not be written to the cache
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Source of live responses
///
/// Implemented by `HttpTransport` for real network access and by test doubles.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Performs a GET request for `url` and returns the body as text
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// `Transport` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests fail after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

/// Cache-first fetcher with a fixed delay before every live request
#[derive(Debug)]
pub struct Fetcher<T> {
    store: CacheStore,
    transport: T,
    min_delay: Duration,
}

impl<T: Transport> Fetcher<T> {
    /// Creates a fetcher using the default one second delay
    pub fn new(store: CacheStore, transport: T) -> Self {
        Self {
            store,
            transport,
            min_delay: DEFAULT_MIN_DELAY,
        }
    }

    /// Overrides the delay applied before each live request
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Returns the body for `url`, using the URL itself as cache key
    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.fetch_keyed(url, url).await
    }

    /// Returns the body for `url`, cached under `cache_key`
    ///
    /// Callers use a distinct key when the locator carries a value that must
    /// not be persisted, such as an API credential. The key must still be
    /// fully determined by the logical request.
    ///
    /// # Returns
    /// * `Ok(String)` - The cached or freshly fetched body
    /// * `Err(FetchError)` - If the live request or the cache write fails
    pub async fn fetch_keyed(&mut self, cache_key: &str, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.store.get(cache_key) {
            debug!(key = cache_key, "using cache");
            return Ok(body.to_string());
        }

        info!(key = cache_key, "fetching");
        tokio::time::sleep(self.min_delay).await;

        let body = self.transport.get(url).await?;
        self.store.put(cache_key, body.as_str())?;

        Ok(body)
    }

    /// Like `fetch_keyed`, but only caches a live body that `parse` accepts
    ///
    /// Cached bodies are parsed the same way. A live body that fails to parse
    /// is returned as an error and never written.
    pub async fn fetch_parsed<V, E, F>(
        &mut self,
        cache_key: &str,
        url: &str,
        parse: F,
    ) -> Result<V, E>
    where
        E: From<FetchError>,
        F: FnOnce(&str) -> Result<V, E>,
    {
        if let Some(body) = self.store.get(cache_key) {
            debug!(key = cache_key, "using cache");
            return parse(body);
        }

        info!(key = cache_key, "fetching");
        tokio::time::sleep(self.min_delay).await;

        let body = self.transport.get(url).await?;
        let value = parse(&body)?;
        self.store.put(cache_key, body).map_err(FetchError::from)?;

        Ok(value)
    }

    /// The underlying cache
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// The transport used for live requests
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The configured pre-request delay
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Consumes the fetcher, returning its cache
    pub fn into_store(self) -> CacheStore {
        self.store
    }
}
