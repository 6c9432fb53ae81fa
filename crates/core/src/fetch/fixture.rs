use std::collections::HashMap;

use serde_json::Value;

use super::{DataFetcher, FetchError, FetchFuture};

enum Canned {
    Document(Value),
    Status(u16),
}

/// In-memory fetcher answering from canned documents.
///
/// Endpoints without a canned answer respond as HTTP 404.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Canned>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, endpoint: impl Into<String>, document: Value) -> Self {
        self.responses.insert(endpoint.into(), Canned::Document(document));
        self
    }

    pub fn with_status(mut self, endpoint: impl Into<String>, status: u16) -> Self {
        self.responses.insert(endpoint.into(), Canned::Status(status));
        self
    }

    fn respond(&self, endpoint: &str) -> Result<Value, FetchError> {
        match self.responses.get(endpoint) {
            Some(Canned::Document(document)) => Ok(document.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                endpoint: endpoint.to_owned(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                endpoint: endpoint.to_owned(),
                status: 404,
            }),
        }
    }
}

impl DataFetcher for StaticFetcher {
    fn fetch_json<'a>(&'a self, endpoint: &'a str) -> FetchFuture<'a> {
        let response = self.respond(endpoint);
        Box::pin(async move {
            // yield once so concurrent fetches interleave like real requests
            tokio::task::yield_now().await;
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_canned_responses() {
        let fetcher = StaticFetcher::new()
            .with_document("/counties", json!({ "features": [] }))
            .with_status("/tracts", 503);

        assert_eq!(fetcher.fetch_json("/counties").await.unwrap(), json!({ "features": [] }));
        assert!(matches!(
            fetcher.fetch_json("/tracts").await,
            Err(FetchError::Status { status: 503, .. })
        ));
        assert!(matches!(
            fetcher.fetch_json("/bikes").await,
            Err(FetchError::Status { status: 404, .. })
        ));
    }
}
