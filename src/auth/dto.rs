use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::users::dto::PublicUser;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Normalizes the email and checks every field before any store write.
    pub fn validate(mut self) -> AppResult<Self> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::validation(
                "name, email and password are required",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation("Invalid email"));
        }
        if self.password.len() < 8 {
            return Err(AppError::validation("Password too short"));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        self.email = self.email.trim().to_lowercase();
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@email.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn register_lowercases_and_trims_email() {
        let req = RegisterRequest {
            name: "  Ada  ".into(),
            email: "  A@B.com ".into(),
            password: "longenough".into(),
        };
        let req = req.validate().expect("valid");
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.name, "Ada");
    }

    #[test]
    fn register_rejects_missing_fields_and_short_password() {
        let missing = RegisterRequest {
            name: "".into(),
            email: "a@b.com".into(),
            password: "longenough".into(),
        };
        assert!(missing.validate().is_err());

        let short = RegisterRequest {
            name: "Ada".into(),
            email: "a@b.com".into(),
            password: "short".into(),
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: "".into(),
        };
        assert!(req.validate().is_err());
    }
}
