// Authentication module - library only (no HTTP server)
//
// Provides:
// - User registration and authentication (email/password)
// - Argon2id password hashing and verification
// - JWT token generation and validation
// - Pluggable user persistence (Postgres or in-memory)

pub mod errors;
pub mod services;
pub mod store;

pub use errors::AuthError;
pub use services::auth::AuthService;
pub use services::security::SecurityService;
pub use store::{InMemoryUserStore, PgUserStore, StoreError, UserStore};
