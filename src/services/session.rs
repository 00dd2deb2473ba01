//! Session state: who is using the front end
//!
//! The session mirrors what the server says about the configured token. It is
//! shared by every view through a `watch` channel so changes are observable,
//! and every capability question fails closed when no user is known.

use std::sync::Arc;
use tokio::sync::watch;

use crate::{api::CatalogService, error::AppResult, models::User};

#[derive(Clone)]
pub struct Session {
    user: Arc<watch::Sender<Option<User>>>,
}

impl Session {
    /// Session with no known user
    pub fn anonymous() -> Self {
        Self::from_user(None)
    }

    pub fn with_user(user: User) -> Self {
        Self::from_user(Some(user))
    }

    fn from_user(user: Option<User>) -> Self {
        let (tx, _rx) = watch::channel(user);
        Self { user: Arc::new(tx) }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    /// Whether the current user may add and delete books
    pub fn is_superuser(&self) -> bool {
        self.user
            .borrow()
            .as_ref()
            .map(User::can_manage_catalog)
            .unwrap_or(false)
    }

    pub fn set_user(&self, user: Option<User>) {
        self.user.send_replace(user);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Ask the server who we are and record the answer.
    ///
    /// An authentication failure clears the session; other failures leave
    /// the last known user in place.
    pub async fn refresh(&self, catalog: &dyn CatalogService) -> AppResult<User> {
        match catalog.read_user_me().await {
            Ok(user) => {
                tracing::info!(
                    "Session user: {} (superuser: {})",
                    user.email,
                    user.is_superuser
                );
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                if e.is_auth() {
                    tracing::warn!("Session rejected by server: {}", e);
                    self.set_user(None);
                }
                Err(e)
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}
