//! Pluggable HTTP transport used by [`Client::take`](crate::Client::take).
//!
//! The client only needs one operation: issue a GET and hand back the status
//! line, the headers and a stream over the body. Anything that can do that
//! (a mock, a proxying client, a recorded fixture) can be injected with
//! [`Client::with_transport`](crate::Client::with_transport).

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use url::Url;

use crate::Result;

/// Response body as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Vec<u8>>>;

/// What a transport returns for a completed request.
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase, e.g. "Bad Request"
    pub status_text: String,
    /// Response headers (values that are not valid UTF-8 are skipped)
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: BodyStream,
}

impl TransportResponse {
    /// Response with an in-memory body delivered as one chunk.
    pub fn from_bytes(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: stream::once(async move { Ok::<_, crate::Error>(body) }).boxed(),
        }
    }

    /// Read the whole body into memory.
    pub async fn bytes(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.body.try_next().await? {
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Performs GET requests on behalf of the client.
///
/// Implementations must be safe to share between tasks; a single client
/// issues concurrent requests through the same transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url`. Network failures map to
    /// [`Error::Transport`](crate::Error::Transport); any HTTP status is a
    /// successful return.
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

#[cfg(feature = "reqwest-transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::stream::{self, StreamExt};
    use log::debug;
    use url::Url;

    use super::{Transport, TransportResponse};
    use crate::{ClientConfig, Error, Result};

    /// Default transport built on `reqwest` with rustls.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        /// Build a transport using the timeout and user agent from `config`.
        pub fn new(config: &ClientConfig) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

            Ok(Self { client })
        }

        /// Wrap an existing `reqwest::Client`.
        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn get(&self, url: &Url) -> Result<TransportResponse> {
            let response = self.client.get(url.clone()).send().await?;

            let status = response.status();
            debug!("GET {}{} -> {}", url.host_str().unwrap_or(""), url.path(), status);

            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();

            let body = stream::try_unfold(response, |mut response| async move {
                let next = response.chunk().await.map_err(Error::from)?;
                Ok::<_, Error>(next.map(|chunk| (chunk.to_vec(), response)))
            })
            .boxed();

            Ok(TransportResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            })
        }
    }
}
