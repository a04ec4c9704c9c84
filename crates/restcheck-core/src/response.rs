//! Captured HTTP response, decoupled from the HTTP client

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An HTTP response as seen by the validator.
///
/// The body is parsed once on construction; `body` is `None` when the text
/// is empty or not valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApiResponse {
    pub status_code: u16,
    /// e.g. `HTTP/1.1 200 OK`
    pub status_line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub body_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Round-trip time in seconds
    #[serde(default)]
    pub elapsed: f64,
}

impl ApiResponse {
    #[must_use]
    pub fn new(
        status_code: u16,
        status_line: impl Into<String>,
        content_type: Option<String>,
        body_text: impl Into<String>,
    ) -> Self {
        let body_text = body_text.into();
        let body = serde_json::from_str(&body_text).ok();
        Self {
            status_code,
            status_line: status_line.into(),
            content_type,
            body_text,
            body,
            elapsed: 0.0,
        }
    }

    /// A `HTTP/1.1 <code> <reason>` JSON response. Mostly useful in tests.
    #[must_use]
    pub fn json(status_code: u16, reason: &str, body: &Value) -> Self {
        Self::new(
            status_code,
            format!("HTTP/1.1 {status_code} {reason}"),
            Some("application/json".to_string()),
            body.to_string(),
        )
    }

    #[must_use]
    pub fn with_elapsed(mut self, elapsed: f64) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Top-level field of an object body.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(key))
    }

    /// Media type without parameters, lowercased: `application/json; charset=utf-8` → `application/json`
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(media_type)
    }
}

pub(crate) fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
