//! JSON-over-HTTP GET helper.
//!
//! Every request issued here is a GET. Callers can add headers, a body and
//! credentials through [`RequestOptions`], but there is no way to change the
//! method. Failures are returned as [`FetchError`] values carrying their
//! original cause; logging them is left to the caller.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid default header '{name}'")]
    InvalidHeader { name: String },

    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, bad URL, ...).
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived with a status outside 200..=299.
    #[error("HTTP error! status: {status} ({url})")]
    Status { status: StatusCode, url: String },

    /// The body could not be decoded into the requested type.
    #[error("failed to decode JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl FetchError {
    /// The HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-request overrides merged on top of the client's defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub bearer_token: Option<String>,
    pub basic_auth: Option<(String, Option<String>)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.basic_auth = Some((username.into(), password));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers(config)?)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let mut request = self.client.get(url);

        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }
        if let Some(token) = &options.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some((username, password)) = &options.basic_auth {
            request = request.basic_auth(username, password.as_ref());
        }

        debug!(url = %url, extra_headers = options.headers.len(), "Sending GET request");

        let start = Instant::now();
        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();

        debug!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Response received"
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn default_headers(config: &HttpConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();

    for (name, value) in &config.default_headers {
        let invalid = || ClientError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// One-shot GET using a client built from the default configuration.
///
/// Each call builds a fresh client, so connections are not pooled between
/// calls. Keep an [`HttpClient`] around to reuse them.
pub async fn fetch_json<T: DeserializeOwned>(
    url: &str,
    options: RequestOptions,
) -> Result<T, FetchError> {
    HttpClient::new(&HttpConfig::default())?
        .fetch_json(url, options)
        .await
}
