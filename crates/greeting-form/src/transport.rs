//! Outbound transport for submissions.
//!
//! The handler hands over an already-serialized JSON body and a relative
//! path; the transport performs the exchange and returns the raw reply.
//! Status codes are reported but never interpreted here.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::FormConfig;
use crate::types::{FormError, FormResult};

/// Content type declared on every submission.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw reply to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Sends a JSON body to a relative endpoint and returns the reply.
#[async_trait::async_trait]
pub trait SubmitTransport: Send + Sync {
    /// POST `body` (JSON text) to `path` and wait for the full reply body.
    async fn post_json(&self, path: &str, body: String) -> FormResult<TransportReply>;
}

/// Shared transport pointer.
pub type TransportPtr = Arc<dyn SubmitTransport>;

/// HTTP transport wrapping reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport resolving paths against `base_url`.
    ///
    /// Without `timeout_ms` a request waits for the server indefinitely.
    pub fn new(base_url: &str, timeout_ms: Option<u64>) -> FormResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| FormError::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("greeting-form/", env!("CARGO_PKG_VERSION")));
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &FormConfig) -> FormResult<Self> {
        Self::new(&config.base_url, config.timeout_ms)
    }

    /// Resolve a relative endpoint the way a page resolves it against its origin.
    pub fn endpoint_url(&self, path: &str) -> FormResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FormError::InvalidUrl(format!("{path}: {e}")))
    }

    pub fn into_ptr(self) -> TransportPtr {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl SubmitTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: String) -> FormResult<TransportReply> {
        let url = self.endpoint_url(path)?;

        let resp = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        tracing::debug!(%url, status, "Submission exchange completed");

        let body = resp.text().await?;
        Ok(TransportReply { status, body })
    }
}
