//! Authentication and session management

pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod session;

pub use middleware::{require_user_id, user_id_from_request};
pub use models::{LoginForm, NewUser, RegisterForm, User};
pub use service::{AuthService, SessionRedirect};
pub use session::{CookieOptions, Session, SessionStore};
