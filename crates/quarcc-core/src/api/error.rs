use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Backend error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    BackendError {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No session token available")]
    MissingToken,
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape returned by the backend: `{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build a backend error from a non-success status and its raw body.
    /// The message is taken from the JSON `error` field when there is one.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        ApiError::BackendError { status, message }
    }

    /// Backend-provided message, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::BackendError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::BackendError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// Human-readable message for display, using `fallback` when the
    /// backend did not say anything useful.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::BackendError { message: Some(m), .. } => m.clone(),
            ApiError::BackendError { message: None, .. } => fallback.to_string(),
            ApiError::NetworkError(_) => {
                "Unable to connect to server. Check your network connection.".to_string()
            }
            ApiError::MalformedResponse(_) => "Unexpected response from server".to_string(),
            ApiError::MissingToken => "Not signed in".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_error_field() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"bad credentials"}"#);
        assert_eq!(err.backend_message(), Some("bad credentials"));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.user_message("Login failed"), "bad credentials");
    }

    #[test]
    fn test_from_status_without_message_uses_fallback() {
        // Query endpoint answers 401 with `response` instead of `error`
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"response":"you need to sign in"}"#,
        );
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.user_message("Query failed"), "Query failed");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.user_message("Signup failed"), "Signup failed");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"   "}"#);
        assert_eq!(err.backend_message(), None);
    }

    #[test]
    fn test_user_message_for_other_kinds() {
        assert_eq!(ApiError::MissingToken.user_message("Query failed"), "Not signed in");
        assert_eq!(
            ApiError::MalformedResponse("missing token".into()).user_message("Login failed"),
            "Unexpected response from server"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");

        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 520 total bytes)"));

        // Never split a multi-byte character
        let accented = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(ApiError::truncate_body(&accented).contains("truncated"));
    }
}
