use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::User;

/// Login credentials sent to `/auth/login`
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration payload sent to `/auth/signup`.
///
/// Anything in `extra` is flattened into the request body alongside the
/// fields the backend requires.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupProfile {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_concordia_affiliate: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for SignupProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupProfile")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .field("is_concordia_affiliate", &self.is_concordia_affiliate)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Success payload of `/auth/signup`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated success payload of `/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_profile_wire_format() {
        let mut extra = Map::new();
        extra.insert("program".into(), Value::from("Finance"));
        let profile = SignupProfile {
            email: "a@concordia.ca".into(),
            password: "hunter2".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: "student".into(),
            is_concordia_affiliate: true,
            extra,
        };

        let json = serde_json::to_value(&profile).expect("Failed to serialize profile");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["isConcordiaAffiliate"], true);
        assert_eq!(json["program"], "Finance");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let creds = Credentials::new("a@x.com", "p4ssw0rd");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("a@x.com"));
        assert!(!shown.contains("p4ssw0rd"));

        let profile = SignupProfile {
            password: "p4ssw0rd".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", profile).contains("p4ssw0rd"));
    }

    #[test]
    fn test_signup_receipt_parses_message() {
        let receipt: SignupReceipt =
            serde_json::from_str(r#"{"message":"User registered successfully"}"#)
                .expect("Failed to parse receipt");
        assert_eq!(receipt.message.as_deref(), Some("User registered successfully"));

        let empty: SignupReceipt = serde_json::from_str("{}").expect("Failed to parse receipt");
        assert!(empty.message.is_none());
    }
}
