//! Core library for the QUARCC member client.
//!
//! Provides the backend API client, the session manager that owns the
//! signed-in state, token storage, and configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionError, SessionManager, SessionStatus, TokenStore};
pub use config::{Config, TokenStoreKind};
