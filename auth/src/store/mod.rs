// Repository pattern for user persistence

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use thiserror::Error;

use cikulche_models::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lookup-and-insert interface over persisted users.
///
/// Implementations own the email-uniqueness guarantee: `insert` must be
/// atomic, so two concurrent inserts of the same email yield exactly one
/// success and one `DuplicateKey`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persist a new user. Fails with `DuplicateKey` if the email is taken.
    async fn insert(&self, user: User) -> Result<User, StoreError>;
}
