//! Client context: one session, one router and one pipeline per process.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store is created once and shared by `Arc` with the router
//! (which reads it in the guard) and the pipeline (which reads the token
//! and clears it on a rejected credential). The router doubles as the
//! pipeline's navigator, so a rejected credential lands on the login route
//! of whichever variant is running.

use std::sync::Arc;

use envelope::{LoginRequest, User};
use tracing::{info, warn};

use crate::api;
use crate::config::{ClientConfig, ClientVariant};
use crate::notify::Notifier;
use crate::pipeline::transport::BuildError;
use crate::pipeline::{ApiError, Pipeline, ReqwestTransport, Transport};
use crate::routes::{Navigation, RouteError, Router, table_for};
use crate::session::SessionStore;
use crate::storage::{FileStorage, SessionStorage};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Route(#[from] RouteError),
}

pub struct DealerClient {
    variant: ClientVariant,
    session: Arc<SessionStore>,
    router: Arc<Router>,
    pipeline: Pipeline,
}

impl DealerClient {
    /// Wire a client from explicit collaborators.
    #[must_use]
    pub fn new(
        variant: ClientVariant,
        storage: Arc<dyn SessionStorage>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = Arc::new(SessionStore::load(storage));
        let router = Arc::new(Router::new(table_for(variant), session.clone()));
        let pipeline = Pipeline::new(session.clone(), transport, notifier, router.clone());
        Self { variant, session, router, pipeline }
    }

    /// Wire a client with file-backed session storage and the reqwest
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, BuildError> {
        let transport = ReqwestTransport::new(&config.base_url, config.timeouts)?;
        let storage = FileStorage::new(config.session_file.clone());
        info!(
            variant = config.variant.as_str(),
            base_url = %config.base_url,
            session_file = %config.session_file.display(),
            "client configured"
        );
        Ok(Self::new(config.variant, Arc::new(storage), Arc::new(transport), notifier))
    }

    #[must_use]
    pub fn variant(&self) -> ClientVariant {
        self.variant
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Navigate through the guard.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate`].
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        self.router.navigate(path)
    }

    /// Authenticate, store the credential and profile, then enter the
    /// landing route.
    ///
    /// # Errors
    ///
    /// [`ClientError::Api`] if the backend rejects the login; the session is
    /// left unchanged in that case.
    pub async fn login(&self, username: &str, password: &str) -> Result<Navigation, ClientError> {
        let request = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let response = api::auth::login(&self.pipeline, &request).await?;

        self.session.set_token(response.token);
        self.session.set_user_info(response.user_info);
        info!(user = %username, admin = self.session.is_admin(), "logged in");

        Ok(self.router.navigate(self.router.table().landing_path())?)
    }

    /// Tell the backend (best effort), clear the session and enter the
    /// login route.
    ///
    /// # Errors
    ///
    /// Only a route table error; a failed backend logout is logged.
    pub async fn logout(&self) -> Result<Navigation, RouteError> {
        if self.session.is_authenticated() {
            let username = self.session.user_info().map(|u| u.username);
            if let Err(e) = api::auth::logout(&self.pipeline, username.as_deref()).await {
                warn!(error = %e, "backend logout failed; clearing local session anyway");
            }
        }
        self.session.logout();
        self.router.navigate(self.router.table().login_path())
    }

    /// Reload the profile behind the current token.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline failure. A rejected credential has already
    /// cleared the session when this returns.
    pub async fn refresh_profile(&self) -> Result<User, ApiError> {
        let response = api::auth::user_info(&self.pipeline).await?;
        self.session.set_user_info(response.user_info.clone());
        Ok(response.user_info)
    }
}

impl std::fmt::Debug for DealerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealerClient")
            .field("variant", &self.variant)
            .field("session", &self.session)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
