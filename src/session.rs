//! Session authentication: sign-in, token renewal, sign-out, and `check`.
//!
//! ARCHITECTURE
//! ============
//! `authenticated` is process-local and starts `false`; the access token is
//! persisted through [`TokenStore`] so a restarted process can renew it.
//! Every successful sign-in stores the new token, flips the flag, and
//! publishes the returned user into the shared [`ProfileStore`].
//!
//! `check` answers from the cheapest source first: the in-memory flag, then
//! token presence, then local expiry, and only then a renewal round-trip.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors propagate unchanged, except from `sign_in_using_token`
//! and `sign_up`, which collapse every failure to `false`. Nothing retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::config::{ClientConfig, Endpoints};
use crate::error::AuthError;
use crate::profile::ProfileStore;
use crate::storage::{StorageError, TokenStore};
use crate::token::{ExpiryRules, now_unix};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{
    Credentials, LoginData, LoginRequest, RegisterRequest, SignUpForm, TokenLoginData, TokenLoginRequest,
    response_code, response_token, response_user,
};

pub struct SessionManager {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    profile: Arc<ProfileStore>,
    endpoints: Endpoints,
    token_key: String,
    expiry: ExpiryRules,
    authenticated: AtomicBool,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        profile: Arc<ProfileStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            transport,
            store,
            profile,
            endpoints: config.endpoints.clone(),
            token_key: config.token_key.clone(),
            expiry: config.expiry,
            authenticated: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn profile(&self) -> &Arc<ProfileStore> {
        &self.profile
    }

    /// Stored access token, or an empty string when none is stored.
    /// An unreadable store reads as empty.
    #[must_use]
    pub fn access_token(&self) -> String {
        match self.store.get(&self.token_key) {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "token store read failed");
                String::new()
            }
        }
    }

    /// Persist `token` as the access token.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be written.
    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(&self.token_key, token)
    }

    // =========================================================================
    // SIGN IN / OUT
    // =========================================================================

    /// Exchange credentials for a session and return the raw response.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AlreadyAuthenticated`] when a session is active; no
    ///   request is sent.
    /// - [`AuthError::Transport`] unchanged from the transport.
    /// - [`AuthError::MalformedResponse`] when the reply carries no token.
    /// - [`AuthError::Storage`] when the token cannot be persisted.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Value, AuthError> {
        if self.is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }

        let payload = LoginRequest { login: LoginData { email: &credentials.email, password: &credentials.password } };
        let response = self
            .transport
            .send(ApiRequest::post(&self.endpoints.login, &payload)?)
            .await?;

        let token = response_token(&response)
            .ok_or_else(|| AuthError::MalformedResponse("login response has no Data.Token".into()))?;
        self.establish(token, &response)?;
        tracing::info!("signed in with credentials");
        Ok(response)
    }

    /// Renew the stored token. Any failure yields `false` and leaves
    /// `authenticated` untouched.
    pub async fn sign_in_using_token(&self) -> bool {
        let token = self.access_token();
        let payload = TokenLoginRequest { login: TokenLoginData { token: &token } };
        let request = match ApiRequest::post(&self.endpoints.token_login, &payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "token renewal request encode failed");
                return false;
            }
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "token renewal rejected");
                return false;
            }
        };
        let Some(new_token) = response_token(&response) else {
            tracing::warn!("token renewal response has no Data.Token");
            return false;
        };
        if let Err(e) = self.establish(new_token, &response) {
            tracing::warn!(error = %e, "token renewal could not persist token");
            return false;
        }
        tracing::info!("signed in with stored token");
        true
    }

    /// Clear the stored token and the authenticated flag. Always `true`.
    pub fn sign_out(&self) -> bool {
        if let Err(e) = self.store.remove(&self.token_key) {
            tracing::warn!(error = %e, "token store remove failed");
        }
        self.authenticated.store(false, Ordering::SeqCst);
        tracing::info!("signed out");
        true
    }

    fn establish(&self, token: &str, response: &Value) -> Result<(), StorageError> {
        self.set_access_token(token)?;
        self.authenticated.store(true, Ordering::SeqCst);
        match response_user(response) {
            Some(user) => self.profile.set_user(user),
            None => tracing::debug!("auth response carried no user"),
        }
        Ok(())
    }

    // =========================================================================
    // CHECK
    // =========================================================================

    /// Whether a session is active, renewing the stored token if needed.
    pub async fn check(&self) -> bool {
        self.check_at(now_unix()).await
    }

    /// Internal: `check` with an explicit clock (for testing).
    async fn check_at(&self, now: i64) -> bool {
        if self.is_authenticated() {
            return true;
        }

        let token = self.access_token();
        if token.is_empty() {
            tracing::debug!("check: no stored token");
            return false;
        }

        if self.expiry.is_expired_at(&token, now) {
            tracing::debug!("check: stored token expired");
            return false;
        }

        self.sign_in_using_token().await
    }

    // =========================================================================
    // ACCOUNT
    // =========================================================================

    /// Register an account. `true` iff the server answers `Result.Code == 0`.
    pub async fn sign_up(&self, form: &SignUpForm) -> bool {
        let request = match ApiRequest::post(&self.endpoints.sign_up, &RegisterRequest::from_form(form)) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "sign-up request encode failed");
                return false;
            }
        };
        match self.transport.send(request).await {
            Ok(response) => {
                let code = response_code(&response);
                tracing::info!(?code, "sign-up answered");
                code == Some(0)
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign-up failed");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] unchanged from the transport.
    pub async fn forgot_password(&self, email: &str) -> Result<Value, AuthError> {
        let request = ApiRequest::post(&self.endpoints.forgot_password, &email)?;
        Ok(self.transport.send(request).await?)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] unchanged from the transport.
    pub async fn reset_password(&self, password: &str) -> Result<Value, AuthError> {
        let request = ApiRequest::post(&self.endpoints.reset_password, &password)?;
        Ok(self.transport.send(request).await?)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] unchanged from the transport.
    pub async fn unlock_session(&self, credentials: &Credentials) -> Result<Value, AuthError> {
        let request = ApiRequest::post(&self.endpoints.unlock_session, credentials)?;
        Ok(self.transport.send(request).await?)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
