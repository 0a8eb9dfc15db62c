//! Login session: token persistence and the current user.

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::LocalStore;

/// Authenticated session over the shared client and local store.
///
/// The token lives in the store across runs and in the client's token slot
/// while the process is alive. A token the server no longer accepts is
/// discarded, not kept around for retries.
pub struct Session {
    api: ApiClient,
    store: LocalStore,
    user: Option<User>,
}

impl Session {
    /// Session with no user attached.
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            api,
            store,
            user: None,
        }
    }

    /// Load the stored token and fetch the current user.
    ///
    /// If the fetch fails for any reason the token is cleared and the
    /// session continues logged out.
    pub async fn restore(api: ApiClient, store: LocalStore) -> Result<Self> {
        let mut session = Self::new(api, store);

        let Some(token) = session.store.token()? else {
            tracing::debug!("No stored token");
            return Ok(session);
        };

        session.api.set_token(Some(token));
        match session.api.current_user().await {
            Ok(user) => {
                tracing::debug!(user = %user.email, role = %user.role, "Session restored");
                session.user = Some(user);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored token rejected, logging out");
                session.logout()?;
            }
        }

        Ok(session)
    }

    /// The shared API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The local store.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Logged-in user or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(AppError::NotAuthenticated)
    }

    /// Log in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let token = self.api.login(email.trim(), password).await?;
        self.accept_token(&token).await
    }

    /// Adopt a token obtained elsewhere (login response or browser sign-in).
    ///
    /// The token is only persisted once the server confirms it.
    pub async fn accept_token(&mut self, token: &str) -> Result<&User> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::InvalidInput("Token is empty".to_string()));
        }

        self.api.set_token(Some(token.to_string()));
        match self.api.current_user().await {
            Ok(user) => {
                self.store.set_token(token)?;
                tracing::info!(user = %user.email, "Logged in");
                let user: &User = self.user.insert(user);
                Ok(user)
            }
            Err(e) => {
                self.logout()?;
                Err(e)
            }
        }
    }

    /// Refetch the current user (after a profile change).
    pub async fn refresh_user(&mut self) -> Result<&User> {
        let user = self.api.current_user().await?;
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    /// Drop the token everywhere.
    pub fn logout(&mut self) -> Result<()> {
        self.api.set_token(None);
        self.user = None;
        self.store.clear_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_restore_without_token_is_logged_out() {
        let store = LocalStore::open_memory().unwrap();
        let api = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();

        let session = Session::restore(api, store).await.unwrap();
        assert!(session.user().is_none());
        assert!(!session.api().has_token());
        assert!(matches!(
            session.require_user(),
            Err(AppError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let store = LocalStore::open_memory().unwrap();
        let api = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let mut session = Session::new(api, store);

        let err = session.login("", "secret").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = session.login("a@b.c", "").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_logout_clears_store_and_client() {
        let store = LocalStore::open_memory().unwrap();
        store.set_token("abc").unwrap();
        let api = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        api.set_token(Some("abc".to_string()));

        let mut session = Session::new(api, store.clone());
        session.logout().unwrap();

        assert!(!session.api().has_token());
        assert_eq!(store.token().unwrap(), None);
    }
}
