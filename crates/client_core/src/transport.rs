use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::protocol::{FilterOutcome, FilterRequest, FilterResponseBody};
use tracing::debug;
use url::Url;

use crate::error::TransportError;

const FILTER_PATH: &str = "filter";

#[async_trait]
pub trait FilterService: Send + Sync {
    async fn submit(&self, request: &FilterRequest) -> Result<FilterOutcome, TransportError>;
}

pub struct HttpFilterService {
    http: Client,
    endpoint: Url,
}

impl HttpFilterService {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(server_url, None)
    }

    pub fn with_timeout(server_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let endpoint = filter_endpoint(server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `http://host/api` and `http://host/api/` both resolve to `http://host/api/filter`.
fn filter_endpoint(server_url: &str) -> Result<Url, TransportError> {
    let server_url = server_url.trim();
    let mut base = Url::parse(server_url).map_err(|source| TransportError::InvalidUrl {
        url: server_url.to_string(),
        source,
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(TransportError::UnsupportedScheme(server_url.to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(FILTER_PATH)
        .map_err(|source| TransportError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })
}

#[async_trait]
impl FilterService for HttpFilterService {
    async fn submit(&self, request: &FilterRequest) -> Result<FilterOutcome, TransportError> {
        let body = serde_json::to_vec(request).map_err(TransportError::Encode)?;
        let res = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        // Status is not inspected; the body shape decides success or failure.
        let status = res.status();
        let bytes = res.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "filter response received");
        let body: FilterResponseBody =
            serde_json::from_slice(&bytes).map_err(|source| TransportError::MalformedBody {
                status: status.as_u16(),
                source,
            })?;
        Ok(FilterOutcome::try_from(body)?)
    }
}
