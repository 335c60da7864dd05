//! User persistence boundary

mod memory;
mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;

use crate::auth::models::{NewUser, User};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence boundary for user records.
///
/// `create` must enforce email uniqueness atomically at the storage
/// layer; the service-level existence check is only a fast path.
/// `Ok(None)` from `create` means the store declined to produce a
/// record (e.g. lost a concurrent-registration race).
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count_by_email(&self, email: &str) -> Result<i64>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create(&self, user: NewUser) -> Result<Option<User>>;
}
