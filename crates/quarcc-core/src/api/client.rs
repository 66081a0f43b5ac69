//! API client for communicating with the QUARCC member backend.
//!
//! This module provides the `ApiClient` struct for the authentication
//! endpoints and the authenticated AI query endpoint.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    Credentials, LoginResponse, QueryRequest, QueryResponse, SignupProfile, SignupReceipt, User,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL (local development backend)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct RawLoginResponse {
    token: Option<String>,
    user: Option<User>,
}

/// API client for the member backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    /// No timeout is set unless one is given; the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %ApiError::truncate_body(&body), "Request rejected by backend");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Decode a success body, mapping shape mismatches to `MalformedResponse`
    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::MalformedResponse(format!("{}: {}", what, e)))
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = Self::check_response(request.send().await?).await?;
        Self::parse(response, path).await
    }

    // ===== Endpoints =====

    /// `GET /auth/verify` - resolve a stored token to its user
    pub async fn verify(&self, token: &str) -> Result<User, ApiError> {
        let url = self.url("/auth/verify");
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let parsed: VerifyResponse = Self::parse(response, "verify response").await?;

        parsed
            .user
            .ok_or_else(|| ApiError::MalformedResponse("verify response has no user".to_string()))
    }

    /// `POST /auth/signup` - register a new account
    pub async fn signup(&self, profile: &SignupProfile) -> Result<SignupReceipt, ApiError> {
        self.post("/auth/signup", profile, None).await
    }

    /// `POST /auth/login` - exchange credentials for a token and user.
    /// A success status without both fields is still an error.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let raw: RawLoginResponse = self.post("/auth/login", credentials, None).await?;

        let token = raw
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("login response has no token".to_string()))?;
        let user = raw
            .user
            .ok_or_else(|| ApiError::MalformedResponse("login response has no user".to_string()))?;

        Ok(LoginResponse { token, user })
    }

    /// `POST /query` - ask the assistant, authenticated with `token`
    pub async fn query(&self, token: &str, query: &str) -> Result<QueryResponse, ApiError> {
        self.post("/query", &QueryRequest { query }, Some(token)).await
    }
}
