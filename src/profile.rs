//! Current-user store with replay-of-latest broadcast.
//!
//! DESIGN
//! ======
//! The user lives in a `tokio::sync::watch` channel holding `Option<User>`.
//! Publishing replaces the value; each subscription starts by yielding the
//! value already present (if any) and then waits for the next publish.
//! Observers that fall behind see the latest user, not every intermediate one.
//!
//! Server responses are trusted verbatim: no validation, no merging.

use std::sync::Arc;

use futures::Stream;
use serde_json::Value;
use tokio::sync::watch;

use crate::config::Endpoints;
use crate::error::AuthError;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{User, UserUpdateRequest};

pub struct ProfileStore {
    transport: Arc<dyn HttpTransport>,
    user_detail_path: String,
    user_update_path: String,
    user: watch::Sender<Option<User>>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: &Endpoints) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            transport,
            user_detail_path: endpoints.user_detail.clone(),
            user_update_path: endpoints.user_update.clone(),
            user,
        }
    }

    /// Publish `user` to every current and future observer.
    pub fn set_user(&self, user: User) {
        tracing::debug!(observers = self.user.receiver_count(), "publishing user");
        self.user.send_replace(Some(user));
    }

    /// Latest published user, if any.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> UserSubscription {
        UserSubscription { rx: self.user.subscribe(), replayed: false }
    }

    /// Infinite stream of user updates, starting with the latest user if one
    /// has been published. Each call returns an independent stream.
    pub fn observe_user(&self) -> impl Stream<Item = User> + Send + 'static {
        futures::stream::unfold(self.subscribe(), |mut sub| async move {
            let user = sub.next().await?;
            Some((user, sub))
        })
    }

    /// Fetch the signed-in user's details and publish them.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns [`AuthError::MalformedResponse`]
    /// if the body is not a user object.
    pub async fn fetch_current_user_detail(&self) -> Result<Value, AuthError> {
        let response = self
            .transport
            .send(ApiRequest::get(&self.user_detail_path))
            .await?;
        self.set_user(decode_user(&response)?);
        Ok(response)
    }

    /// Send `{ user }` as a partial update and publish the server's answer.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns [`AuthError::MalformedResponse`]
    /// if the body is not a user object.
    pub async fn update(&self, user: &User) -> Result<Value, AuthError> {
        let request = ApiRequest::patch(&self.user_update_path, &UserUpdateRequest { user })?;
        let response = self.transport.send(request).await?;
        self.set_user(decode_user(&response)?);
        Ok(response)
    }
}

fn decode_user(response: &Value) -> Result<User, AuthError> {
    serde_json::from_value(response.clone()).map_err(|e| AuthError::MalformedResponse(format!("user: {e}")))
}

/// Pull-based view of the current user.
pub struct UserSubscription {
    rx: watch::Receiver<Option<User>>,
    replayed: bool,
}

impl UserSubscription {
    /// Next user update. The first call resolves immediately when a user has
    /// already been published. Returns `None` once the store is dropped.
    pub async fn next(&mut self) -> Option<User> {
        if !self.replayed {
            self.replayed = true;
            let latest = self.rx.borrow_and_update().clone();
            if latest.is_some() {
                return latest;
            }
        }
        loop {
            self.rx.changed().await.ok()?;
            let latest = self.rx.borrow_and_update().clone();
            if latest.is_some() {
                return latest;
            }
        }
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
