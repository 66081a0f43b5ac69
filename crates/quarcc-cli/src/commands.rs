//! Command handlers. Each one reads or acts on the shared session and
//! prints a short result for the user.

use anyhow::{bail, Result};

use quarcc_core::models::{Credentials, SignupProfile};
use quarcc_core::SessionManager;

use crate::Command;

/// Environment variable checked before prompting for a password
const PASSWORD_ENV: &str = "QUARCC_PASSWORD";

pub async fn run(command: Command, session: &SessionManager) -> Result<()> {
    match command {
        Command::Status => status(session),
        Command::Signup {
            email,
            first_name,
            last_name,
            role,
            affiliate,
        } => {
            let profile = SignupProfile {
                email: email.trim().to_string(),
                password: read_password()?,
                first_name,
                last_name,
                role,
                is_concordia_affiliate: affiliate,
                ..Default::default()
            };
            signup(session, profile).await
        }
        Command::Signin { email } => {
            let credentials = Credentials::new(email.trim(), read_password()?);
            signin(session, credentials).await
        }
        Command::Signout => {
            session.signout();
            println!("Signed out.");
            Ok(())
        }
        Command::Ask { query } => ask(session, &query.join(" ")).await,
    }
}

fn read_password() -> Result<String> {
    match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn status(session: &SessionManager) -> Result<()> {
    let current = session.session();
    println!("Status: {}", current.status().label());
    if let Some(user) = current.user() {
        match user.email() {
            Some(email) => println!("User:   {} <{}>", user.display_name(), email),
            None => println!("User:   {}", user.display_name()),
        }
        if let Some(role) = user.role() {
            println!("Role:   {}", role);
        }
    }
    if let Some(at) = current.authenticated_at() {
        println!("Since:  {}", at.format("%b %d, %Y %H:%M UTC"));
    }
    println!("API:    {}", session.api_url());
    Ok(())
}

async fn signup(session: &SessionManager, profile: SignupProfile) -> Result<()> {
    if profile.email.is_empty() || profile.password.is_empty() {
        bail!("Email and password required");
    }
    let email = profile.email.clone();
    let receipt = session.signup(&profile).await?;

    println!("{}", receipt.message.as_deref().unwrap_or("Account created"));
    println!("Sign in with: quarcc signin --email {}", email);
    Ok(())
}

async fn signin(session: &SessionManager, credentials: Credentials) -> Result<()> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
        bail!("Email and password required");
    }
    let login = session.signin(&credentials).await?;
    println!("Welcome back, {}!", login.user.display_name());
    Ok(())
}

async fn ask(session: &SessionManager, query: &str) -> Result<()> {
    let answer = session.query(query).await?;
    println!("{}", answer.response.trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quarcc_core::auth::MemoryTokenStore;
    use quarcc_core::{ApiClient, SessionStatus};

    use super::*;

    fn offline_session() -> SessionManager {
        // Nothing listens on port 9; a request would fail and set last_error
        let api = ApiClient::new("http://127.0.0.1:9/api", None).expect("Failed to build client");
        SessionManager::new(api, Arc::new(MemoryTokenStore::new()))
    }

    fn profile(email: &str, password: &str) -> SignupProfile {
        SignupProfile {
            email: email.into(),
            password: password.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: "student".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_signin_requires_email_and_password() {
        let session = offline_session();
        session.initialize().await;

        for (email, password) in [("", "p"), ("a@concordia.ca", "")] {
            let err = signin(&session, Credentials::new(email, password))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Email and password required");
        }

        assert!(session.session().last_error().is_none());
        assert_eq!(session.session().status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_signup_requires_email_and_password() {
        let session = offline_session();
        session.initialize().await;

        for (email, password) in [("", "p"), ("a@concordia.ca", "")] {
            let err = signup(&session, profile(email, password)).await.unwrap_err();
            assert_eq!(err.to_string(), "Email and password required");
        }

        assert!(session.session().last_error().is_none());
    }

    #[tokio::test]
    async fn test_signout_command_always_succeeds() {
        let session = offline_session();
        session.initialize().await;

        run(Command::Signout, &session).await.unwrap();
        run(Command::Signout, &session).await.unwrap();
        assert_eq!(session.session().status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_ask_without_session_reports_not_signed_in() {
        let session = offline_session();
        session.initialize().await;

        let err = run(Command::Ask { query: vec!["hello".into()] }, &session)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not signed in");
    }
}
