pub mod auth;

pub use auth::{AuthResponse, Claims, LoginRequest, RegisterRequest, User, DEFAULT_CYCLE_LENGTH};
