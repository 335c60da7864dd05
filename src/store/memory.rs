//! In-memory user store, for tests and local development

use crate::auth::models::{NewUser, User};
use crate::error::Result;
use crate::store::UserRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users keyed by email. Inserts are atomic under the write lock, which
/// stands in for the database's unique constraint.
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Total number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn count_by_email(&self, email: &str) -> Result<i64> {
        let users = self.users.read().await;
        Ok(users.contains_key(email) as i64)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            // Lost the check-then-create race
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            created_at: chrono::Utc::now(),
        };
        users.insert(new_user.email, user.clone());
        Ok(Some(user))
    }
}
