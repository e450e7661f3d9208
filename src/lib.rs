//! Client-side session authentication and user-profile state.
//!
//! ARCHITECTURE
//! ============
//! [`session::SessionManager`] owns the in-memory authenticated flag and the
//! persisted access token; on every successful sign-in it publishes the
//! returned user into [`profile::ProfileStore`], which replays the latest user
//! to any number of observers. Both talk to the backend through the
//! [`transport::HttpTransport`] port, and the token lives behind the
//! [`storage::TokenStore`] port, so neither touches global state.

pub mod config;
pub mod error;
pub mod i18n;
pub mod profile;
pub mod session;
pub mod storage;
pub mod token;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ClientConfig;
pub use error::{AuthError, ErrorCode};
pub use profile::{ProfileStore, UserSubscription};
pub use session::SessionManager;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{ExpiryRules, MissingExpiryPolicy};
pub use transport::{ApiRequest, HttpTransport, Method, ReqwestTransport, TransportError};
pub use types::{Credentials, SignUpForm, User};
