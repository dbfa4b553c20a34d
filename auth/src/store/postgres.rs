use async_trait::async_trait;
use sqlx::{PgPool, Row};

use cikulche_models::User;

use super::{StoreError, UserStore};

/// Postgres-backed user store. The `users` table (see `migrations/`) carries
/// the unique email constraint that makes `insert` atomic.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, full_name, birth_year,
                   average_cycle_length, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            name: row.get("full_name"),
            birth_year: row.get("birth_year"),
            average_cycle_length: row.get("average_cycle_length"),
            created_at: row.get("created_at"),
        }))
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, full_name, birth_year,
                average_cycle_length, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.name.as_ref())
        .bind(user.birth_year)
        .bind(user.average_cycle_length)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateKey("email".to_string()))
            }
            Err(e) => {
                tracing::error!("Database error inserting user: {:?}", e);
                Err(StoreError::Database(e))
            }
        }
    }
}
