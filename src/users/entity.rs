use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    auth::password::hash_password,
    error::{FieldErrors, RestErr, RestResult},
    helpers::now_string,
};

pub const MIN_PASSWORD_LEN: usize = 8;

/// User record. Doubles as the request body for registration and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 hash once persisted, never exposed in JSON
    #[serde(skip_deserializing)]
    pub created_at: Option<String>,
    #[serde(skip_deserializing)]
    pub updated_at: Option<String>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn password_problem(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("password is required");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("password must be at least 8 characters");
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Some("password must contain letters and digits");
    }
    None
}

impl User {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        self.nickname = self.nickname.trim().to_string();
    }

    pub fn validate(&self) -> RestResult<()> {
        let mut fields = FieldErrors::new();

        if self.email.is_empty() {
            fields.insert("email".into(), "email is required".into());
        } else if !is_valid_email(&self.email) {
            fields.insert("email".into(), "invalid email".into());
        }
        if self.nickname.is_empty() {
            fields.insert("nickname".into(), "nickname is required".into());
        }
        if let Some(problem) = password_problem(&self.password) {
            fields.insert("password".into(), problem.into());
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(RestErr::validation("invalid user", fields))
        }
    }

    /// Hashes the plaintext password and stamps `created_at`. Only for first insert.
    pub fn before_save(&mut self) -> RestResult<()> {
        self.password = hash_password(&self.password)?;
        self.created_at = Some(now_string());
        Ok(())
    }
}
