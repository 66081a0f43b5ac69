//! REST API client module for the QUARCC member backend.
//!
//! This module provides the `ApiClient` for the four endpoints the
//! session layer needs: token verification, registration, login, and
//! the authenticated AI query.
//!
//! Authenticated calls carry the session token as a bearer credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
