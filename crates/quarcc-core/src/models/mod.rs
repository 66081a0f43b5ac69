//! Data models for the QUARCC member API.
//!
//! - `User`: the opaque signed-in identity
//! - `Credentials`, `SignupProfile`: request payloads
//! - `LoginResponse`, `SignupReceipt`, `QueryResponse`: success payloads

pub mod account;
pub mod query;
pub mod user;

pub use account::{Credentials, LoginResponse, SignupProfile, SignupReceipt};
pub use query::{QueryRequest, QueryResponse};
pub use user::User;
