//! Execution engine: one blocking HTTP call per invocation, no retries

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use trimcheck_core::{EndpointSpec, ExecutionResult, HarnessConfig, HttpMethod, RequestSnapshot};

/// Request never produced a response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectivityError {
    #[error("Timed out after {0}s")]
    Timeout(u64),
    #[error("Unreachable: {0}")]
    Unreachable(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP client error: {0}")]
    ClientBuild(String),
    #[error("Invalid header {0}: {1}")]
    InvalidHeader(String, String),
}

/// Shared blocking client plus the headers every request carries
#[derive(Debug, Clone)]
pub struct Engine {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
    auth_headers: Vec<(String, String)>,
    extra_headers: BTreeMap<String, String>,
}

impl Engine {
    /// Engine with the configured per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or a configured header
    /// is not valid HTTP.
    pub fn new(config: &HarnessConfig) -> Result<Self, EngineError> {
        Self::with_timeout(config, Duration::from_secs(config.timeout_secs))
    }

    /// Engine with an explicit timeout, independent of the config
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or a configured header
    /// is not valid HTTP.
    pub fn with_timeout(config: &HarnessConfig, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::ClientBuild(e.to_string()))?;

        let mut auth_headers = Vec::new();
        if let Some(token) = &config.api_token {
            auth_headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if let Some(key) = &config.api_key {
            auth_headers.push(("X-API-Key".to_string(), key.clone()));
        }

        for (name, value) in auth_headers.iter().map(|(k, v)| (k, v)).chain(&config.headers) {
            check_header(name, value)?;
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            auth_headers,
            extra_headers: config.headers.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent to `endpoint`, in send order
    #[must_use]
    pub fn request_headers(&self, endpoint: &EndpointSpec) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if !endpoint.is_file_upload() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            headers.push(("Accept".to_string(), "application/json".to_string()));
        }
        headers.extend(self.auth_headers.iter().cloned());
        headers.extend(
            self.extra_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        headers
    }

    /// Send one request and read the full response.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] when no response was received or the
    /// body could not be read.
    pub fn invoke(
        &self,
        endpoint: &EndpointSpec,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ExecutionResult, ConnectivityError> {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let method = match endpoint.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &url);
        let mut sent_headers = BTreeMap::new();
        for (k, v) in self.request_headers(endpoint) {
            builder = builder.header(&k, &v);
            sent_headers.insert(k, v);
        }
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let body_text = body.map(Value::to_string);
        if let Some(text) = &body_text {
            builder = builder.body(text.clone());
        }

        let request = builder
            .build()
            .map_err(|e| ConnectivityError::Transport(e.to_string()))?;
        let snapshot = RequestSnapshot {
            method: endpoint.method.to_string(),
            url: request.url().to_string(),
            headers: sent_headers,
            body: body_text,
        };
        tracing::debug!(method = %snapshot.method, url = %snapshot.url, body = ?snapshot.body, "sending");

        let start = Instant::now();
        let resp = self
            .client
            .execute(request)
            .map_err(|e| self.connectivity(&e))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = resp.text().map_err(|e| self.connectivity(&e))?;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(ExecutionResult::new(
            status,
            content_type,
            &text,
            elapsed_ms,
            snapshot,
        ))
    }

    fn connectivity(&self, e: &reqwest::Error) -> ConnectivityError {
        if e.is_timeout() {
            ConnectivityError::Timeout(self.timeout.as_secs())
        } else if e.is_connect() {
            ConnectivityError::Unreachable(e.to_string())
        } else {
            ConnectivityError::Transport(e.to_string())
        }
    }
}

/// Headers are checked once so no request silently loses one
fn check_header(name: &str, value: &str) -> Result<(), EngineError> {
    reqwest::header::HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| EngineError::InvalidHeader(name.to_string(), e.to_string()))?;
    reqwest::header::HeaderValue::from_str(value)
        .map_err(|e| EngineError::InvalidHeader(name.to_string(), e.to_string()))?;
    Ok(())
}
