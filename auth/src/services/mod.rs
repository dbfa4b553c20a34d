pub mod auth;
pub mod security;

pub use auth::AuthService;
pub use security::SecurityService;
