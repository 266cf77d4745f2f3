//! Per-call execution record and body truncation helpers

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored response body cap
pub const MAX_BODY_BYTES: usize = 4096;

/// Body excerpt length in failure reports
pub const EXCERPT_BYTES: usize = 200;

/// Request as sent, for reports and `.http` reproduction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Outcome of one HTTP call that reached the server
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub status: u16,
    pub content_type: Option<String>,
    /// Raw text, capped at [`MAX_BODY_BYTES`]
    pub body: String,
    /// Full response text; skip markers and text rules match against this
    pub text: String,
    /// Parsed from the full text when the response declares JSON
    pub json: Option<Value>,
    pub elapsed_ms: u64,
    pub request: RequestSnapshot,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(
        status: u16,
        content_type: Option<String>,
        text: &str,
        elapsed_ms: u64,
        request: RequestSnapshot,
    ) -> Self {
        let json = content_type
            .as_deref()
            .filter(|ct| is_json_content_type(ct))
            .and_then(|_| serde_json::from_str(text).ok());
        Self {
            status,
            content_type,
            body: cap_body(text),
            text: text.to_string(),
            json,
            elapsed_ms,
            request,
        }
    }

    #[must_use]
    pub fn declares_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(is_json_content_type)
    }

    /// Short body excerpt for failure reports
    #[must_use]
    pub fn excerpt(&self) -> String {
        excerpt(&self.body)
    }
}

#[must_use]
pub fn is_json_content_type(ct: &str) -> bool {
    ct.trim_start()
        .to_ascii_lowercase()
        .starts_with("application/json")
}

/// Longest prefix of `s` no longer than `max` bytes that ends on a char boundary
#[must_use]
pub fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Cap a body for storage, noting the original size
#[must_use]
pub fn cap_body(text: &str) -> String {
    if text.len() <= MAX_BODY_BYTES {
        text.to_string()
    } else {
        format!(
            "{}…({} bytes total)",
            truncate_on_char_boundary(text, MAX_BODY_BYTES),
            text.len()
        )
    }
}

#[must_use]
pub fn excerpt(text: &str) -> String {
    let cut = truncate_on_char_boundary(text, EXCERPT_BYTES);
    if cut.len() < text.len() {
        format!("{cut}…")
    } else {
        cut.to_string()
    }
}
