//! HTTP client for the WHOIS proxy endpoint.
//!
//! The proxy takes a single domain and answers with a small JSON envelope:
//!
//! ```text
//! { "domain": "...", "isRegistered": true, "whoisData": { ... }, "error": "..." }
//! ```
//!
//! `whoisData` is an opaque payload — the core assumes no structure beyond
//! the envelope. Non-success HTTP statuses and body-level `error` fields are
//! both translated into errors before they reach the dispatcher, which
//! records them per its error policy. The client imposes a request timeout
//! but performs no retries.

use std::time::Duration;

use serde::Deserialize;

use crate::error::BatchError;
use crate::types::QueryResult;

/// Default per-request timeout for proxy queries.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON envelope returned by the WHOIS proxy.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyResponse {
    domain: String,
    #[serde(default)]
    is_registered: bool,
    #[serde(default)]
    whois_data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for querying domain availability through the WHOIS proxy.
#[derive(Debug, Clone)]
pub struct WhoisProxyClient {
    /// HTTP client for proxy requests
    http_client: reqwest::Client,
    /// Base URL of the proxy endpoint (e.g. "https://api.example.com/whois")
    base_url: String,
    /// Timeout for each proxy request
    timeout: Duration,
}

impl WhoisProxyClient {
    /// Create a new client for the given proxy endpoint.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BatchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BatchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BatchError::network_with_source("Failed to create proxy HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// The configured proxy endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the proxy for a single fully qualified domain.
    ///
    /// # Errors
    ///
    /// Returns `BatchError` if the request fails, the proxy answers with a
    /// non-success status, the body cannot be parsed, or the body carries an
    /// `error` field.
    pub async fn query(&self, domain: &str) -> Result<QueryResult, BatchError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("domain", domain)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BatchError::timeout(format!("query for '{}'", domain), self.timeout)
                } else {
                    BatchError::query(domain, format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BatchError::query_with_status(
                domain,
                format!("proxy returned {}", status),
                status.as_u16(),
            ));
        }

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| BatchError::query(domain, format!("failed to parse response: {}", e)))?;

        into_result(body)
    }
}

/// Translate the proxy envelope into a terminal [`QueryResult`].
///
/// A body-level `error` becomes an `Err` so the dispatcher applies its
/// uniform failure policy; a successful envelope yields a result whose
/// `data` carries the opaque `whoisData` payload.
fn into_result(body: ProxyResponse) -> Result<QueryResult, BatchError> {
    if let Some(error) = body.error {
        return Err(BatchError::query(body.domain, error));
    }

    Ok(QueryResult {
        domain: body.domain,
        is_registered: body.is_registered,
        data: Some(body.whois_data.unwrap_or(serde_json::Value::Null)),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_normalizes_base_url() {
        let client = WhoisProxyClient::new("https://api.example.com/whois/").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/whois");
    }

    #[test]
    fn test_parse_registered_envelope() {
        let body: ProxyResponse = serde_json::from_str(
            r#"{"domain": "11.com", "isRegistered": true, "whoisData": {"registrar": "Example"}}"#,
        )
        .unwrap();
        let result = into_result(body).unwrap();
        assert_eq!(result.domain, "11.com");
        assert!(result.is_registered);
        assert!(!result.is_available());
        assert_eq!(result.data.unwrap()["registrar"], "Example");
    }

    #[test]
    fn test_parse_available_envelope() {
        let body: ProxyResponse =
            serde_json::from_str(r#"{"domain": "zq9.com", "isRegistered": false}"#).unwrap();
        let result = into_result(body).unwrap();
        assert!(result.is_available());
        // Missing whoisData still yields a populated (null) payload
        assert_eq!(result.data, Some(serde_json::Value::Null));
    }

    #[test]
    fn test_body_error_becomes_query_error() {
        let body: ProxyResponse = serde_json::from_str(
            r#"{"domain": "11.com", "isRegistered": false, "error": "lookup failed"}"#,
        )
        .unwrap();
        let err = into_result(body).unwrap_err();
        assert!(matches!(err, BatchError::QueryError { .. }));
        assert!(err.to_string().contains("lookup failed"));
    }
}
