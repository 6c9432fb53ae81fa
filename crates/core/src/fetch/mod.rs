//! Layer data fetching.
//!
//! [`DataFetcher`] is the seam between the layer builder and the network: the
//! map uses [`HttpFetcher`], tests and offline runs use [`StaticFetcher`].

mod fixture;
mod http;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

pub use fixture::StaticFetcher;
pub use http::HttpFetcher;

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send + 'a>>;

/// GET an endpoint and parse its body as JSON.
///
/// Calls are independent: no retries, no caching. Callers choose how many to
/// run at once.
pub trait DataFetcher: Send + Sync {
    fn fetch_json<'a>(&'a self, endpoint: &'a str) -> FetchFuture<'a>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("GET {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    #[error("GET {endpoint} returned invalid JSON: {reason}")]
    InvalidJson { endpoint: String, reason: String },
}

impl FetchError {
    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Status { endpoint, .. }
            | FetchError::Network { endpoint, .. }
            | FetchError::InvalidJson { endpoint, .. } => endpoint,
        }
    }
}
