//! Session lifecycle: startup verification, signup, signin, signout, and
//! authenticated queries.
//!
//! Operations never hold the session lock across a network call. Two
//! overlapping `signin` calls are not serialized: whichever response
//! arrives last overwrites the session. Startup verification is the one
//! exception, its result is dropped if the token changed while it ran.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, LoginResponse, QueryResponse, SignupProfile, SignupReceipt};

use super::session::Phase;
use super::{Session, TokenStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{}", .0.user_message("Signup failed"))]
    Registration(#[source] ApiError),

    #[error("{}", .0.user_message("Login failed"))]
    Authentication(#[source] ApiError),

    #[error("{}", .0.user_message("Query failed"))]
    Query(#[source] ApiError),
}

impl SessionError {
    /// The underlying transport/backend failure
    pub fn api_error(&self) -> &ApiError {
        match self {
            SessionError::Registration(e)
            | SessionError::Authentication(e)
            | SessionError::Query(e) => e,
        }
    }
}

/// Owns the process's single `Session`.
///
/// Create one at startup and hand clones to whatever needs to read the
/// session or act on it. Clones share state.
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<Session>>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            store,
            state: Arc::new(state),
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receive every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn api_url(&self) -> &str {
        self.api.base_url()
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Restore a persisted session.
    ///
    /// Never fails: a missing, unreadable, or rejected token leaves the
    /// session anonymous. A rejected token is removed from storage. Only the
    /// first call does anything.
    pub async fn initialize(&self) {
        let stored = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token, discarding it");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to remove stored token");
                }
                None
            }
        };

        let token = match stored {
            Some(token) => token,
            None => {
                self.state.send_if_modified(|s| {
                    let starting = s.phase == Phase::Starting;
                    if starting {
                        s.phase = Phase::Ready;
                    }
                    starting
                });
                debug!("No stored token");
                return;
            }
        };

        let started = self.state.send_if_modified(|s| {
            if s.phase != Phase::Starting {
                return false;
            }
            s.token = Some(token.clone());
            s.phase = Phase::Verifying;
            true
        });
        if !started {
            debug!("Session already initialized");
            return;
        }

        debug!("Verifying stored token");
        match self.api.verify(&token).await {
            Ok(user) => {
                let name = user.display_name();
                let applied = self.state.send_if_modified(|s| {
                    if s.phase != Phase::Verifying || s.token.as_deref() != Some(token.as_str()) {
                        return false;
                    }
                    s.set_authenticated(token.clone(), user);
                    true
                });
                if applied {
                    info!(user = %name, "Restored session");
                } else {
                    debug!("Session changed during verification, discarding result");
                }
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected, discarding it");
                let applied = self.state.send_if_modified(|s| {
                    if s.phase != Phase::Verifying || s.token.as_deref() != Some(token.as_str()) {
                        return false;
                    }
                    s.clear_identity();
                    true
                });
                if applied {
                    if let Err(e) = self.store.clear() {
                        warn!(error = %e, "Failed to remove stored token");
                    }
                } else {
                    debug!("Session changed during verification, discarding result");
                }
            }
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Register a new account. Does not sign in.
    pub async fn signup(&self, profile: &SignupProfile) -> Result<SignupReceipt, SessionError> {
        self.clear_error();

        match self.api.signup(profile).await {
            Ok(receipt) => {
                info!(email = %profile.email, "Account registered");
                Ok(receipt)
            }
            Err(e) => Err(self.fail(SessionError::Registration(e))),
        }
    }

    /// Sign in, replacing any current token and user
    pub async fn signin(&self, credentials: &Credentials) -> Result<LoginResponse, SessionError> {
        self.clear_error();

        match self.api.login(credentials).await {
            Ok(login) => {
                if let Err(e) = self.store.save(&login.token) {
                    warn!(error = %e, "Failed to persist token");
                }
                self.state
                    .send_modify(|s| s.set_authenticated(login.token.clone(), login.user.clone()));
                info!(user = %login.user.display_name(), "Signed in");
                Ok(login)
            }
            Err(e) => Err(self.fail(SessionError::Authentication(e))),
        }
    }

    /// Drop the current session, in memory and in storage
    pub fn signout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove stored token");
        }
        self.state.send_modify(Session::clear_identity);
        info!("Signed out");
    }

    /// Ask the assistant. Requires a current token; without one no request
    /// is sent.
    pub async fn query(&self, query: &str) -> Result<QueryResponse, SessionError> {
        let token = self.state.borrow().token.clone();
        let token = match token {
            Some(token) => token,
            None => return Err(self.fail(SessionError::Query(ApiError::MissingToken))),
        };

        match self.api.query(&token, query).await {
            Ok(response) => Ok(response),
            Err(e) => Err(self.fail(SessionError::Query(e))),
        }
    }

    fn clear_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// Record `err` as the session's last error and hand it back
    fn fail(&self, err: SessionError) -> SessionError {
        warn!(error = %err.api_error(), "Session operation failed");
        let message = err.to_string();
        self.state.send_modify(|s| s.last_error = Some(message));
        err
    }
}
