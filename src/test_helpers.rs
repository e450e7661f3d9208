//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::profile::ProfileStore;
use crate::session::SessionManager;
use crate::storage::MemoryTokenStore;
use crate::transport::{ApiRequest, HttpTransport, TransportError};

// =========================================================================
// MockTransport
// =========================================================================

/// Records every request and answers from a queue of canned results.
/// An empty queue answers with a request error.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no mock response queued".into())))
    }
}

// =========================================================================
// Tokens
// =========================================================================

/// Unsigned JWT-shaped token carrying `claims` as its payload.
pub fn jwt_with_claims(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Token expiring `offset_secs` from now (negative for the past).
pub fn jwt_expiring_in(offset_secs: i64) -> String {
    jwt_with_claims(&serde_json::json!({ "exp": crate::token::now_unix() + offset_secs }))
}

// =========================================================================
// Wiring
// =========================================================================

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryTokenStore>,
    pub profile: Arc<ProfileStore>,
    pub session: SessionManager,
}

pub fn harness() -> Harness {
    harness_with_config(&ClientConfig::default())
}

pub fn harness_with_config(config: &ClientConfig) -> Harness {
    let transport = Arc::new(MockTransport::new());
    let store = Arc::new(MemoryTokenStore::new());
    let profile = Arc::new(ProfileStore::new(transport.clone(), &config.endpoints));
    let session = SessionManager::new(transport.clone(), store.clone(), profile.clone(), config);
    Harness { transport, store, profile, session }
}

/// Successful login/renewal payload as the backend sends it.
pub fn auth_payload(token: &str, name: &str) -> Value {
    serde_json::json!({
        "Data": { "Token": token },
        "user": { "name": name, "email": format!("{}@empresa.com.br", name.to_lowercase()) }
    })
}
