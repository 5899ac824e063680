//! Session lifecycle
//!
//! Issue at login, read anywhere, invalidate at logout.

use super::store::{MemorySessionStore, SessionStore};
use super::types::Session;
use crate::api::AuthApi;
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Ties the login endpoint and the session store into one lifecycle
#[derive(Clone)]
pub struct SessionManager {
    auth: AuthApi,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Create a manager over the given store
    pub fn new(auth: AuthApi, store: Arc<dyn SessionStore>) -> Self {
        Self { auth, store }
    }

    /// Create a manager whose session lives only in this process
    pub fn in_memory(auth: AuthApi) -> Self {
        Self::new(auth, Arc::new(MemorySessionStore::new()))
    }

    /// Sign in and issue a session
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session> {
        let outcome = self.auth.login(identifier, password).await?;
        let session = Session::from_login(&outcome);
        self.store.save(&session).await?;
        info!(
            "signed in as {} ({})",
            session.display_name,
            session.role.as_str()
        );
        Ok(session)
    }

    /// The current session, if signed in
    pub async fn current(&self) -> Result<Option<Session>> {
        self.store.load().await
    }

    /// The current session, or [`Error::NotLoggedIn`]
    pub async fn require(&self) -> Result<Session> {
        self.current().await?.ok_or(Error::NotLoggedIn)
    }

    /// Invalidate the session; a no-op when not signed in
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        info!("signed out");
        Ok(())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}
