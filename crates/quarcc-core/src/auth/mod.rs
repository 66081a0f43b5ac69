//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: owns the session and every transition of it
//! - `Session`: read-only view of the current user, token, and last error
//! - `TokenStore`: durable token storage (file, OS keyring, or memory)
//!
//! A stored token is verified against the backend on startup and
//! discarded if the backend rejects it.

pub mod manager;
pub mod session;
pub mod storage;

pub use manager::{SessionError, SessionManager};
pub use session::{Session, SessionStatus};
pub use storage::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
