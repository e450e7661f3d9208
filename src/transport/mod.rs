//! HTTP transport port.
//!
//! DESIGN
//! ======
//! Services only ever see [`HttpTransport`]: a single JSON-in/JSON-out call.
//! [`ReqwestTransport`] is the production implementation; tests substitute a
//! recording mock. Failures are reported once, here, and the services decide
//! whether to propagate or collapse them.

mod http;

pub use http::ReqwestTransport;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The response body was not valid JSON.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// One request to the backend. `path` is relative to the API base URL
/// unless it is already absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self { method: Method::Get, path: path.to_owned(), body: None }
    }

    /// Build a `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encode`] if `body` cannot be serialized.
    pub fn post(path: &str, body: &impl Serialize) -> Result<Self, TransportError> {
        Ok(Self { method: Method::Post, path: path.to_owned(), body: Some(encode(body)?) })
    }

    /// Build a `PATCH` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encode`] if `body` cannot be serialized.
    pub fn patch(path: &str, body: &impl Serialize) -> Result<Self, TransportError> {
        Ok(Self { method: Method::Patch, path: path.to_owned(), body: Some(encode(body)?) })
    }
}

fn encode(body: &impl Serialize) -> Result<Value, TransportError> {
    serde_json::to_value(body).map_err(|e| TransportError::Encode(e.to_string()))
}

/// Request/response access to the remote API.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the decoded JSON response body.
    ///
    /// An empty success body decodes to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure, non-success status,
    /// or an undecodable body.
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
