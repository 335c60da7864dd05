//! PostgreSQL user store

use crate::auth::models::{NewUser, User};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::UserRepository;
use async_trait::async_trait;
use tokio_postgres::Row;
use uuid::Uuid;

pub struct PostgresUserRepository {
    client: tokio_postgres::Client,
}

impl PostgresUserRepository {
    /// Connect to the configured database and spawn the connection driver
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn_string = format!(
            "host={} port={} user={} password={} dbname={}",
            config.host, config.port, config.user, config.password, config.dbname
        );

        let (client, connection) =
            tokio_postgres::connect(&conn_string, tokio_postgres::NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Create the users table if it doesn't exist. The unique constraint
    /// on email is the real guard against concurrent registrations.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    first_name TEXT NOT NULL DEFAULT '',
                    last_name TEXT NOT NULL DEFAULT '',
                    created_at TIMESTAMPTZ NOT NULL
                )",
                &[],
            )
            .await?;
        Ok(())
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn count_by_email(&self, email: &str) -> Result<i64> {
        let row = self
            .client
            .query_one("SELECT COUNT(*) FROM users WHERE email = $1", &[&email])
            .await?;
        Ok(row.get(0))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, email, password_hash, first_name, last_name, created_at
                 FROM users WHERE email = $1",
                &[&email],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now();

        // ON CONFLICT DO NOTHING returns no row when a concurrent insert
        // won the race, which surfaces as Ok(None)
        let row = self
            .client
            .query_opt(
                "INSERT INTO users (id, email, password_hash, first_name, last_name, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (email) DO NOTHING
                 RETURNING id, email, password_hash, first_name, last_name, created_at",
                &[
                    &id,
                    &new_user.email,
                    &new_user.password_hash,
                    &new_user.first_name,
                    &new_user.last_name,
                    &created_at,
                ],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }
}
