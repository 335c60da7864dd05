//! Kudos - session-based authentication service
//!
//! This is the library interface for Kudos, exposing the authentication
//! workflow, the signed-cookie session store, and the user persistence
//! boundary for programmatic use.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use auth::AuthService;
pub use config::Config;
pub use error::Error;
