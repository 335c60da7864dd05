//! Authentication models

use serde::{Deserialize, Serialize};

/// A stored user record. Owned by the user repository: created on
/// registration, read on login, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Unique email, the login identifier
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Registration input. Transient; the plaintext password is hashed
/// before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login input. Transient.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// What the repository is asked to persist for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn from_form(form: &RegisterForm, password_hash: String) -> Self {
        Self {
            email: form.email.clone(),
            password_hash,
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
        }
    }
}
