//! HTTP transport for PIXm queries.
//!
//! One GET per call, bounded by the query's timeout. Any HTTP status counts
//! as a completed round trip; classifying the body is left to the resolver.

use pixm_core::RawResult;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ClientConfig;
use crate::error::{PixmError, TransportError};
use crate::query::PreparedQuery;

/// Issues PIXm GET requests
#[derive(Clone)]
pub struct QueryTransport {
    http: reqwest::Client,
    headers: HeaderMap,
}

impl QueryTransport {
    /// Create a transport sending the configured header set
    pub fn new(config: &ClientConfig) -> Result<Self, PixmError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.request_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PixmError::Validation(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| PixmError::Validation(format!("invalid header value '{}': {}", value, e)))?;
            headers.insert(name, value);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            headers,
        })
    }

    /// Send the query and capture status and body.
    ///
    /// If the deadline passes first the in-flight request is dropped and
    /// nothing of the body is kept.
    pub async fn execute(&self, query: &PreparedQuery) -> Result<RawResult, TransportError> {
        tracing::info!(
            url = %query.url,
            timeout_secs = query.timeout_secs,
            "HTTP GET Request"
        );
        tracing::debug!(headers = ?self.headers, "HTTP GET Request Headers");

        let call = async {
            let response = self
                .http
                .get(query.url.clone())
                .headers(self.headers.clone())
                .send()
                .await?;
            let status_code = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResult::new(status_code, body.to_vec()))
        };

        match tokio::time::timeout(query.timeout(), call).await {
            Ok(Ok(raw)) => {
                tracing::info!(
                    status = raw.status_code,
                    bytes = raw.body.len(),
                    "HTTP Response"
                );
                tracing::trace!(body = %raw.body_text(), "HTTP Response body");
                Ok(raw)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, url = %query.url, "PIXm request failed");
                Err(TransportError::Network(e))
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = query.timeout_secs,
                    url = %query.url,
                    "PIXm request timed out"
                );
                Err(TransportError::Timeout {
                    timeout_secs: query.timeout_secs,
                })
            }
        }
    }
}
