//! Structural expectations a response must satisfy

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::CheckKind;

/// Top-level key holding the outcome in dog.ceo responses.
pub const STATUS_KEY: &str = "status";
/// Top-level key holding the payload in dog.ceo responses.
pub const MESSAGE_KEY: &str = "message";
/// Expected value of [`STATUS_KEY`].
pub const SUCCESS: &str = "success";

/// Fixed set of structural checks.
///
/// Built once per suite and never mutated while checks run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    pub status_code: u16,
    pub status_line: String,
    pub content_type: String,
    #[serde(default)]
    pub content_type_match: ContentTypeMatch,
    /// Keys the JSON object body must contain, in check order
    #[serde(default)]
    pub required_keys: Vec<String>,
    /// Designated key and the literal it must hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<ExpectedField>,
}

/// How the `Content-Type` header is compared with [`Expectation::content_type`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTypeMatch {
    /// Whole header, byte for byte
    #[default]
    Exact,
    /// Media type only: parameters dropped, case ignored
    MediaType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedField {
    pub key: String,
    pub value: Value,
}

impl Expectation {
    /// `200`, `HTTP/1.1 200 OK`, `application/json`, no body constraints.
    #[must_use]
    pub fn ok_json() -> Self {
        Self {
            status_code: 200,
            status_line: "HTTP/1.1 200 OK".to_string(),
            content_type: "application/json".to_string(),
            content_type_match: ContentTypeMatch::Exact,
            required_keys: Vec::new(),
            field: None,
        }
    }

    /// dog.ceo envelope: `{"status": "success", "message": ...}`
    #[must_use]
    pub fn dog_api() -> Self {
        Self::ok_json()
            .with_required_keys([STATUS_KEY, MESSAGE_KEY])
            .with_field(STATUS_KEY, Value::String(SUCCESS.to_string()))
    }

    /// Petstore returns bare arrays or pet objects with no envelope.
    #[must_use]
    pub fn petstore() -> Self {
        Self::ok_json()
    }

    /// Add required keys. Duplicates are ignored.
    #[must_use]
    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.required_keys.contains(&key) {
                self.required_keys.push(key);
            }
        }
        self
    }

    /// Accept `application/json; charset=utf-8` where `application/json` is expected.
    #[must_use]
    pub fn with_media_type_match(mut self) -> Self {
        self.content_type_match = ContentTypeMatch::MediaType;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.field = Some(ExpectedField {
            key: key.into(),
            value,
        });
        self
    }

    /// Checks in evaluation order.
    #[must_use]
    pub fn checks(&self) -> Vec<CheckKind> {
        let mut checks = vec![
            CheckKind::StatusCode,
            CheckKind::StatusLine,
            CheckKind::ContentType,
        ];
        checks.extend(
            self.required_keys
                .iter()
                .map(|k| CheckKind::RequiredKey(k.clone())),
        );
        if let Some(field) = &self.field {
            checks.push(CheckKind::FieldValue(field.key.clone()));
        }
        checks
    }

    pub(crate) fn requires_key(&self, key: &str) -> bool {
        self.required_keys.iter().any(|k| k == key)
    }
}
