//! User domain model and onboarding forms

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::de;
use super::result::{Error, Result};

/// Balance every new account starts with, in Naira
pub const STARTING_BALANCE: i64 = 20000;

/// Prefix of every generated account number
pub const ACCOUNT_NUMBER_PREFIX: &str = "1234";

/// The signed-in user as returned by `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub balance: Decimal,
    #[serde(default)]
    pub account_number: Option<String>,
    /// Unix milliseconds
    #[serde(default, rename = "created_at")]
    pub created_at: Option<i64>,
}

impl User {
    /// Best available display name
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_ref().filter(|n| !n.trim().is_empty()) {
            return name.clone();
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return joined;
        }
        self.email.clone().unwrap_or_else(|| format!("user {}", self.id))
    }

    /// Initials for the dashboard greeting ("JD")
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

/// Login form
#[derive(Debug, Clone, Serialize)]
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

    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::validation("Please fill in all required fields."));
        }
        Ok(())
    }
}

/// Signup form as filled in by the user
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

fn looks_like_email(text: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.password,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::validation("Please fill in all required fields."));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(Error::validation("Please enter a valid email address."));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }
        Ok(())
    }
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub name: String,
    pub account_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl SignupRequest {
    /// Build the request, assigning an account number and starting balance
    pub fn from_form(form: &SignupForm) -> Self {
        let first_name = form.first_name.trim().to_string();
        let last_name = form.last_name.trim().to_string();
        Self {
            name: format!("{} {}", first_name, last_name),
            first_name,
            last_name,
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            password: form.password.clone(),
            account_number: generate_account_number(),
            balance: Decimal::from(STARTING_BALANCE),
        }
    }
}

/// `"1234"` followed by six random zero-padded digits
pub fn generate_account_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}{:06}", ACCOUNT_NUMBER_PREFIX, suffix)
}

/// Response of login and signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken", default)]
    pub auth_token: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "08012345678".to_string(),
            password: "s3cret!".to_string(),
            confirm_password: "s3cret!".to_string(),
        }
    }

    #[test]
    fn test_account_number_shape() {
        for _ in 0..50 {
            let number = generate_account_number();
            assert_eq!(number.len(), 10);
            assert!(number.starts_with("1234"));
            assert!(number.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_signup_request_defaults() {
        let request = SignupRequest::from_form(&valid_form());
        assert_eq!(request.balance, Decimal::from(20000));
        assert_eq!(request.name, "Ada Obi");
        assert!(request.account_number.starts_with("1234"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["accountNumber"].as_str().unwrap().len(), 10);
        assert!(json.get("confirmPassword").is_none());
    }

    #[test]
    fn test_signup_validation() {
        assert!(valid_form().validate().is_ok());

        let mut mismatch = valid_form();
        mismatch.confirm_password = "other".to_string();
        let err = mismatch.validate().unwrap_err();
        assert!(err.to_string().contains("Passwords do not match"));

        let mut missing = valid_form();
        missing.phone = "  ".to_string();
        assert!(missing.validate().is_err());

        let mut bad_email = valid_form();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_user_from_baas_payload() {
        let user: User = serde_json::from_str(
            r#"{"id": 12, "name": "Ada Obi", "email": "ada@example.com",
                "balance": 20000, "accountNumber": "1234000001", "created_at": 1700000000000}"#,
        )
        .unwrap();
        assert_eq!(user.id, "12");
        assert_eq!(user.balance, Decimal::from(20000));
        assert_eq!(user.account_number.as_deref(), Some("1234000001"));
        assert_eq!(user.initials(), "AO");
    }

    #[test]
    fn test_auth_response_without_token() {
        let resp: AuthResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(resp.auth_token.is_none());
        assert_eq!(resp.extra["message"], "ok");
    }
}
