//! Authentication workflow
//!
//! Composes the user repository, password hashing, and the cookie
//! session store. All business rules for register/login live here; the
//! HTTP layer only translates results into responses.

use crate::auth::models::{LoginForm, NewUser, RegisterForm};
use crate::auth::password;
use crate::auth::session::{SessionStore, USER_ID_KEY};
use crate::error::{Error, Result};
use crate::store::UserRepository;
use std::sync::Arc;

/// Where the default post-auth redirect lands
pub const DEFAULT_REDIRECT: &str = "/";

/// Successful authentication: a redirect plus the committed session cookie
#[derive(Debug, Clone)]
pub struct SessionRedirect {
    pub location: String,
    pub set_cookie: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: SessionStore) -> Self {
        Self { users, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Register a new account and start a session for it.
    ///
    /// The existence check is a fast-path only; the repository's unique
    /// constraint on email is the real guarantee against concurrent
    /// registrations.
    pub async fn register(&self, form: RegisterForm) -> Result<SessionRedirect> {
        if self.users.count_by_email(&form.email).await? > 0 {
            return Err(Error::DuplicateUser);
        }

        let password_hash = password::hash_password(&form.password)?;
        let new_user = NewUser::from_form(&form, password_hash);

        let user = self
            .users
            .create(new_user)
            .await?
            .ok_or(Error::UserCreation { email: form.email })?;

        tracing::info!(user_id = %user.id, "registered new user");
        self.create_session(&user.id, DEFAULT_REDIRECT)
    }

    /// Authenticate an existing account and start a session for it.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller, in both the error value and (via the padded verify) timing.
    pub async fn login(&self, form: LoginForm) -> Result<SessionRedirect> {
        let user = match self.users.find_by_email(&form.email).await? {
            Some(user) => user,
            None => {
                password::equalize_verify(&form.password);
                return Err(Error::InvalidCredentials);
            }
        };

        if !password::verify_password(&form.password, &user.password_hash) {
            return Err(Error::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.create_session(&user.id, DEFAULT_REDIRECT)
    }

    /// Mint a session carrying `userId` and point the caller at `redirect_to`
    pub fn create_session(&self, user_id: &str, redirect_to: &str) -> Result<SessionRedirect> {
        let mut session = self.sessions.get_session();
        session.set(USER_ID_KEY, user_id);

        Ok(SessionRedirect {
            location: redirect_to.to_string(),
            set_cookie: self.sessions.commit_session(&session)?,
        })
    }

    /// End the caller's session: expire the cookie, redirect to /login
    pub fn logout(&self) -> SessionRedirect {
        SessionRedirect {
            location: "/login".to_string(),
            set_cookie: self.sessions.destroy_session(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::CookieOptions;
    use crate::store::InMemoryUserRepository;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            SessionStore::new("test-secret", CookieOptions::default()),
        )
    }

    fn register_form(email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_redirects_with_session() {
        let service = service();
        let redirect = service
            .register(register_form("a@x.com", "pw1"))
            .await
            .unwrap();

        assert_eq!(redirect.location, "/");
        let session = service.sessions().read_session(&redirect.set_cookie).unwrap();
        assert!(session.user_id().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_rejected() {
        let service = service();
        service
            .register(register_form("a@x.com", "pw1"))
            .await
            .unwrap();

        let result = service.register(register_form("a@x.com", "pw2")).await;
        assert!(matches!(result, Err(Error::DuplicateUser)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service();
        service
            .register(register_form("a@x.com", "pw1"))
            .await
            .unwrap();

        let result = service
            .login(LoginForm {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error() {
        let service = service();
        let result = service
            .login(LoginForm {
                email: "nobody@x.com".to_string(),
                password: "pw1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_create_session_round_trip() {
        let service = service();
        let redirect = service.create_session("user-7", "/").unwrap();

        let session = service.sessions().read_session(&redirect.set_cookie).unwrap();
        assert_eq!(session.user_id(), Some("user-7"));
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let service = service();
        let redirect = service.logout();
        assert_eq!(redirect.location, "/login");
        assert!(redirect.set_cookie.contains("Max-Age=0"));
    }
}
