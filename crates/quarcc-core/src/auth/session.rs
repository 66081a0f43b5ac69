use chrono::{DateTime, Utc};

use crate::models::User;

/// Observable authentication status, derived from the session contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Anonymous,
    Authenticated,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::Anonymous => "signed out",
            SessionStatus::Authenticated => "signed in",
        }
    }
}

/// Where the session is in its startup lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Created, `initialize` has not run yet
    Starting,
    /// A stored token is being verified
    Verifying,
    /// Startup finished or superseded by an explicit signin/signout
    Ready,
}

/// In-memory authentication state.
///
/// Only `SessionManager` mutates it; everything else reads snapshots.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) user: Option<User>,
    pub(crate) token: Option<String>,
    pub(crate) last_error: Option<String>,
    pub(crate) authenticated_at: Option<DateTime<Utc>>,
    pub(crate) phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            last_error: None,
            authenticated_at: None,
            phase: Phase::Starting,
        }
    }
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The bearer token, present while signed in or while a stored token
    /// is being verified
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Message from the most recent failed operation
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the current user was established (signin or verification)
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::Starting | Phase::Verifying => SessionStatus::Initializing,
            Phase::Ready if self.user.is_some() => SessionStatus::Authenticated,
            Phase::Ready => SessionStatus::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub(crate) fn set_authenticated(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
        self.authenticated_at = Some(Utc::now());
        self.phase = Phase::Ready;
    }

    pub(crate) fn clear_identity(&mut self) {
        self.token = None;
        self.user = None;
        self.authenticated_at = None;
        self.phase = Phase::Ready;
    }
}
