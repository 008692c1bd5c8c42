use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::ApiErrorResponse;
use super::params::Query;

pub const DEFAULT_HOST: &str = "https://api.up.com.au/api/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiErrorResponse),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Pagination link has no page[after] cursor: {0}")]
    MissingCursor(String),

    #[error("Host URL cannot carry a path: {0}")]
    InvalidHost(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Client for the Up banking API.
#[derive(Debug, Clone)]
pub struct UpClient {
    token: String,
    host: Url,
    page_size: u32,
    http: reqwest::Client,
}

impl UpClient {
    pub fn new(token: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            token: token.into(),
            host: Url::parse(DEFAULT_HOST)?,
            page_size: DEFAULT_PAGE_SIZE,
            http: reqwest::Client::new(),
        })
    }

    pub fn with_host(mut self, host: Url) -> Self {
        self.host = host;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Resolve path segments below the API host.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidHost(self.host.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the JSON body into `T`.
    pub(super) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<T, SourceError> {
        let request = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(&[("page[size]", self.page_size.to_string())])
            .query(query)
            .build()?;

        let url = request.url().clone();
        debug!(method = %request.method(), url = %url, "->");

        let exchange = async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            result = exchange => result?,
        };

        debug!(status = %status, url = %url, "<-");

        if status.is_client_error() || status.is_server_error() {
            return Err(match serde_json::from_slice::<ApiErrorResponse>(&body) {
                Ok(errors) => SourceError::Api(errors),
                Err(_) => SourceError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                },
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Extract the `page[after]` cursor from a `links.next` URL.
pub(super) fn next_cursor(next: &str) -> Result<String, SourceError> {
    let url = Url::parse(next)?;
    url.query_pairs()
        .find(|(name, _)| name == "page[after]")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| SourceError::MissingCursor(next.to_string()))
}
