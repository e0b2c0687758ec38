//! Retrying HTTP client.
//!
//! POSTs a JSON body to `{base_url}/{path}` and decodes the `{result, error}`
//! envelope. Transport failures are retried with backoff; an abort signal
//! preempts the in-flight attempt and all remaining retries.

use std::sync::Arc;

use async_trait::async_trait;
use quiver_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::request::{Request, Requester, Response};
use crate::retry::RetryConfig;
use crate::signal::SignalSource;
use crate::transport::{RawResponse, ReqwestTransport, Transport, TransportError};

/// Configuration for [`HttpClient`].
///
/// # Example
///
/// ```ignore
/// let config = HttpClientConfig::new("https://my-index.example.com")
///     .bearer("token")
///     .retry(RetryConfig::retries(3));
/// let client = HttpClient::new(config)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Base URL; a trailing slash is trimmed
    pub base_url: String,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
    /// Retry policy for transport failures
    pub retry: RetryConfig,
    /// Cancellation source
    pub signal: Option<SignalSource>,
}

impl HttpClientConfig {
    /// Config for a base URL with default retries and no signal.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Add a static bearer authorization header.
    pub fn bearer(self, token: &str) -> Self {
        self.header(AUTHORIZATION.as_str(), format!("Bearer {}", token))
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cancellation source.
    pub fn signal(mut self, signal: impl Into<SignalSource>) -> Self {
        self.signal = Some(signal.into());
        self
    }
}

/// The production [`Requester`].
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    headers: HeaderMap,
    invalid_header: Option<String>,
    retry: RetryConfig,
    signal: Option<SignalSource>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client backed by reqwest.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a custom [`Transport`].
    ///
    /// A header that cannot be sent over HTTP (e.g. a token containing a
    /// newline) is logged here; every request made by the client then fails
    /// with `Error::Config` before reaching the network.
    pub fn with_transport(config: HttpClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut invalid_header = None;
        for (name, value) in &config.headers {
            match parse_header(name, value) {
                Ok((name, value)) => {
                    headers.insert(name, value);
                }
                Err(reason) => {
                    warn!(target: "quiver::http", header = %name, %reason, "Header cannot be sent");
                    invalid_header.get_or_insert(reason);
                }
            }
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            invalid_header,
            retry: config.retry,
            signal: config.signal,
            transport,
        })
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Retry policy in effect.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    fn url_for(&self, path: &[String]) -> String {
        std::iter::once(self.base_url.as_str())
            .chain(path.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn decode(&self, raw: RawResponse) -> Result<Response> {
        let envelope = serde_json::from_slice::<Response>(&raw.body);

        if !raw.is_success() {
            let message = envelope
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("HTTP status {}", raw.status));
            return Err(Error::Service {
                message,
                status: Some(raw.status),
            });
        }

        envelope.map_err(|e| Error::Serialization {
            reason: format!("invalid response body: {}", e),
        })
    }
}

fn parse_header(name: &str, value: &str) -> std::result::Result<(HeaderName, HeaderValue), String> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| format!("invalid header name '{}': {}", name, e))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| format!("invalid value for header '{}': {}", name, e))?;
    Ok((name, value))
}

#[async_trait]
impl Requester for HttpClient {
    async fn request(&self, req: Request) -> Result<Response> {
        if let Some(reason) = &self.invalid_header {
            return Err(Error::Config {
                reason: reason.clone(),
            });
        }
        let url = self.url_for(&req.path);
        let body = serde_json::to_vec(&req.body)?;
        let signal = self.signal.as_ref().map(SignalSource::signal);
        let attempts = self.retry.attempts();
        let mut last_error: Option<TransportError> = None;

        for attempt in 0..attempts {
            if let Some(reason) = signal.as_ref().and_then(|s| s.reason()) {
                debug!(target: "quiver::http", %url, %reason, "request aborted before attempt");
                return Ok(Response::aborted(reason));
            }

            let send = self.transport.post(&url, &self.headers, body.clone());
            let outcome = match &signal {
                Some(signal) => tokio::select! {
                    reason = signal.aborted() => {
                        debug!(target: "quiver::http", %url, %reason, "request aborted in flight");
                        return Ok(Response::aborted(reason));
                    }
                    outcome = send => outcome,
                },
                None => send.await,
            };

            match outcome {
                Ok(raw) => return self.decode(raw),
                Err(e) => {
                    warn!(
                        target: "quiver::http",
                        %url,
                        attempt = attempt + 1,
                        attempts,
                        error = %e,
                        "Request failed"
                    );
                    last_error = Some(e);
                }
            }

            if attempt + 1 < attempts {
                let delay = self.retry.delay(attempt);
                match &signal {
                    Some(signal) => tokio::select! {
                        reason = signal.aborted() => {
                            debug!(target: "quiver::http", %url, %reason, "request aborted during backoff");
                            return Ok(Response::aborted(reason));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    },
                    None => tokio::time::sleep(delay).await,
                }
            }
        }

        Err(Error::Transport {
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "exhausted all retries".to_string()),
            attempts,
        })
    }
}
