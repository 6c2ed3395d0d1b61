//! Session store: who this client is authenticated as.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` exists per client process. The router reads it before
//! every navigation and the request pipeline reads it before every call and
//! tears it down on authentication failure.
//!
//! DESIGN
//! ======
//! The in-memory transition and the durability write are separate steps:
//! every mutator updates the `Session` under the mutex and then writes
//! through [`SessionStorage`] while still holding it, so the durable order of
//! writes matches the in-memory order even with concurrent completions.
//! Storage failures are logged and never surface; the store itself is total.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use envelope::User;
use tracing::{debug, info, warn};

use crate::storage::SessionStorage;

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized [`User`].
pub const USER_INFO_KEY: &str = "userInfo";

/// Credential and profile of the current client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token; empty when unauthenticated.
    pub token: String,
    pub profile: Option<User>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

pub struct SessionStore {
    state: Mutex<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// Missing keys mean "no session". An unreadable profile, or a profile
    /// without a token, is dropped.
    #[must_use]
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let token = read_key(storage.as_ref(), TOKEN_KEY).unwrap_or_default();
        let profile = read_key(storage.as_ref(), USER_INFO_KEY).and_then(|raw| match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding unreadable persisted user info");
                None
            }
        });

        let profile = if token.is_empty() && profile.is_some() {
            warn!("discarding persisted user info without a token");
            None
        } else {
            profile
        };

        debug!(authenticated = !token.is_empty(), has_profile = profile.is_some(), "session restored");
        Self { state: Mutex::new(Session { token, profile }), storage }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Session is plain data; a panic elsewhere cannot leave it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current token, empty string if none.
    #[must_use]
    pub fn token(&self) -> String {
        self.lock().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    #[must_use]
    pub fn user_info(&self) -> Option<User> {
        self.lock().profile.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// `true` only when a profile is present and its role is `ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.lock().profile.as_ref().is_some_and(User::is_admin)
    }

    /// Store `token` and persist it. The token is opaque and not validated.
    ///
    /// Setting an empty token is equivalent to [`SessionStore::logout`].
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            self.logout();
            return;
        }

        let mut state = self.lock();
        state.token.clone_from(&token);
        self.persist_set(TOKEN_KEY, &token);
        debug!("session token updated");
    }

    /// Store the user profile and persist it.
    ///
    /// Ignored while no token is set, so a profile never outlives its
    /// credential.
    pub fn set_user_info(&self, user: User) {
        let mut state = self.lock();
        if !state.is_authenticated() {
            warn!(user = %user.username, "ignoring user info without a session token");
            return;
        }

        match serde_json::to_string(&user) {
            Ok(raw) => self.persist_set(USER_INFO_KEY, &raw),
            Err(e) => warn!(error = %e, "failed to encode user info for storage"),
        }
        debug!(user = %user.username, role = ?user.role, "session profile updated");
        state.profile = Some(user);
    }

    /// Clear token and profile in memory and storage.
    ///
    /// Idempotent. Returns whether a session was actually torn down.
    pub fn logout(&self) -> bool {
        let mut state = self.lock();
        let had_session = state.is_authenticated() || state.profile.is_some();
        *state = Session::default();
        self.persist_remove(TOKEN_KEY);
        self.persist_remove(USER_INFO_KEY);
        if had_session {
            info!("session cleared");
        }
        had_session
    }

    fn persist_set(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "session storage write failed");
        }
    }

    fn persist_remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "session storage remove failed");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.is_authenticated())
            .field("profile", &state.profile)
            .finish_non_exhaustive()
    }
}

fn read_key(storage: &dyn SessionStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "session storage read failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
