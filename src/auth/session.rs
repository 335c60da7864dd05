//! Cookie session store
//!
//! Sessions are an opaque key-value mapping serialized into a signed
//! cookie: `base64(json payload) . base64(hmac_sha256(payload))`. There
//! is no server-side session storage; possession of a validly signed
//! cookie is the session.

use crate::config::Config;
use crate::error::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Session key under which the authenticated user's id is stored
pub const USER_ID_KEY: &str = "userId";

/// Opaque session data carried by the cookie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    values: HashMap<String, String>,
}

impl Session {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The authenticated user id, if this session carries one
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_KEY)
    }
}

/// Cookie attributes applied on commit
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub name: String,
    /// Max-Age in seconds
    pub max_age_seconds: u64,
    /// Set only in production
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: "kudos-session".to_string(),
            max_age_seconds: 60 * 60 * 24 * 30,
            secure: false,
        }
    }
}

impl CookieOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.session.cookie_name.clone(),
            max_age_seconds: config.session.max_age_seconds,
            secure: config.secure_cookies(),
        }
    }
}

/// Signs sessions into cookies and verifies them back out.
/// The secret is set once at startup and never rotated at runtime.
#[derive(Clone)]
pub struct SessionStore {
    secret: String,
    options: CookieOptions,
}

impl SessionStore {
    pub fn new(secret: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            secret: secret.into(),
            options,
        }
    }

    /// A fresh, empty session
    pub fn get_session(&self) -> Session {
        Session::default()
    }

    /// Serialize and sign a session into a complete `Set-Cookie` header value
    pub fn commit_session(&self, session: &Session) -> Result<String> {
        let token = self.sign(session)?;
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.options.name, token, self.options.max_age_seconds
        );
        if self.options.secure {
            cookie.push_str("; Secure");
        }
        Ok(cookie)
    }

    /// A `Set-Cookie` header value that expires the session cookie
    pub fn destroy_session(&self) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
            self.options.name
        );
        if self.options.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Extract and verify this store's cookie from a `Cookie` header value
    pub fn read_session(&self, cookie_header: &str) -> Result<Session> {
        let prefix = format!("{}=", self.options.name);
        for cookie in cookie_header.split(';') {
            if let Some(token) = cookie.trim().strip_prefix(&prefix) {
                return self.verify(token);
            }
        }
        Err(Error::InvalidSession)
    }

    fn sign(&self, session: &Session) -> Result<String> {
        let payload = serde_json::to_string(session)?;
        let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid session secret: {}", e)))?;
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{}.{}", payload_b64, signature_b64))
    }

    fn verify(&self, token: &str) -> Result<Session> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(Error::InvalidSession)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid session secret: {}", e)))?;
        mac.update(payload_b64.as_bytes());

        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| Error::InvalidSession)?;
        mac.verify_slice(&signature)
            .map_err(|_| Error::InvalidSession)?;

        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| Error::InvalidSession)?;
        let session: Session =
            serde_json::from_slice(&payload).map_err(|_| Error::InvalidSession)?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new("test-secret", CookieOptions::default())
    }

    #[test]
    fn test_commit_and_read_round_trip() {
        let store = store();
        let mut session = store.get_session();
        session.set(USER_ID_KEY, "user-42");

        let cookie = store.commit_session(&session).unwrap();
        let restored = store.read_session(&cookie).unwrap();
        assert_eq!(restored.user_id(), Some("user-42"));
    }

    #[test]
    fn test_cookie_attributes() {
        let store = store();
        let cookie = store.commit_session(&store.get_session()).unwrap();

        assert!(cookie.starts_with("kudos-session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_attribute_in_production() {
        let store = SessionStore::new(
            "test-secret",
            CookieOptions {
                secure: true,
                ..CookieOptions::default()
            },
        );
        let cookie = store.commit_session(&store.get_session()).unwrap();
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let store = store();
        let mut session = store.get_session();
        session.set(USER_ID_KEY, "user-42");
        let cookie = store.commit_session(&session).unwrap();

        // Rewrite the user id inside the payload while keeping the
        // original signature attached
        let token = cookie
            .split(';')
            .next()
            .unwrap()
            .strip_prefix("kudos-session=")
            .unwrap();
        let (payload_b64, signature_b64) = token.split_once('.').unwrap();
        let payload = general_purpose::URL_SAFE_NO_PAD.decode(payload_b64).unwrap();
        let forged_payload = String::from_utf8(payload)
            .unwrap()
            .replace("user-42", "user-43");
        let forged = format!(
            "kudos-session={}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(forged_payload.as_bytes()),
            signature_b64
        );

        assert!(store.read_session(&forged).is_err());
        // Truncated tokens fail too
        assert!(store.read_session("kudos-session=abc").is_err());
        // The untouched cookie still verifies
        assert_eq!(
            store.read_session(&cookie).unwrap().user_id(),
            Some("user-42")
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let store = store();
        let cookie = store.commit_session(&store.get_session()).unwrap();

        let other = SessionStore::new("other-secret", CookieOptions::default());
        assert!(other.read_session(&cookie).is_err());
    }

    #[test]
    fn test_missing_cookie_rejected() {
        let store = store();
        assert!(store.read_session("unrelated=1; other=2").is_err());
    }

    #[test]
    fn test_destroy_session_expires_cookie() {
        let cookie = store().destroy_session();
        assert!(cookie.contains("Max-Age=0"));
    }
}
