use serde_json::Value;

use super::{DataFetcher, FetchError, FetchFuture};

pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    async fn get(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "fetching layer data");

        let network = |e: reqwest::Error| FetchError::Network {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(network)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_owned(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| FetchError::InvalidJson {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl DataFetcher for HttpFetcher {
    fn fetch_json<'a>(&'a self, endpoint: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(endpoint))
    }
}
