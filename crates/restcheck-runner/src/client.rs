//! Blocking HTTP client producing [`ApiResponse`] snapshots

use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use restcheck_core::ApiResponse;

/// Thin wrapper over `reqwest::blocking::Client`.
///
/// One request at a time, no retries. A request blocks until the response
/// arrives or the configured timeout elapses.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self { http })
    }

    /// # Errors
    ///
    /// Returns error on connection failure, timeout or unreadable body.
    pub fn get(&self, url: &str) -> Result<ApiResponse, ClientError> {
        self.send("GET", url, self.http.get(url))
    }

    /// GET with query parameters appended to `url`.
    ///
    /// # Errors
    ///
    /// Returns error on connection failure, timeout or unreadable body.
    pub fn get_query(&self, url: &str, query: &[(&str, &str)]) -> Result<ApiResponse, ClientError> {
        self.send("GET", url, self.http.get(url).query(query))
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns error on connection failure, timeout or unreadable body.
    pub fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        self.send("POST", url, self.http.post(url).json(body))
    }

    fn send(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let start = Instant::now();
        let resp = request
            .send()
            .map_err(|e| ClientError::Http(format!("{method} {url}: {e}")))?;
        let elapsed = start.elapsed().as_secs_f64();

        let status = resp.status();
        // StatusCode displays as "200 OK", Version debugs as "HTTP/1.1"
        let status_line = format!("{:?} {status}", resp.version());
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body_text = resp
            .text()
            .map_err(|e| ClientError::Body(format!("{method} {url}: {e}")))?;

        tracing::debug!(
            method,
            url,
            status = status.as_u16(),
            elapsed,
            bytes = body_text.len(),
            "response received"
        );

        Ok(ApiResponse::new(status.as_u16(), status_line, content_type, body_text).with_elapsed(elapsed))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client build error: {0}")]
    Build(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Response body error: {0}")]
    Body(String),
}
