//! Core business logic for the authentication system.
//!
//! Orchestrates the password hasher, the token issuer and the user store to
//! implement `register` and `login`. Stateless per call: all mutation goes
//! through the store.

use anyhow::anyhow;
use chrono::Utc;
use serde_json::Map;
use uuid::Uuid;
use validator::Validate;

use cikulche_config::AuthConfig;
use cikulche_models::{
    AuthResponse, Claims, LoginRequest, RegisterRequest, User, DEFAULT_CYCLE_LENGTH,
};

use crate::errors::AuthError;
use crate::store::{StoreError, UserStore};

use super::security::SecurityService;

pub struct AuthService<S: UserStore> {
    store: S,
    security: SecurityService,
    // Verified against when login hits an unknown email, so the miss costs
    // the same as a real digest check and lookups cannot be timed apart.
    dummy_hash: String,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, config: &AuthConfig) -> Result<Self, AuthError> {
        let security = SecurityService::new(config)?;
        let dummy_hash = security
            .hash_password("unused-padding-password")
            .map_err(|e| anyhow!("Failed to precompute padding digest: {}", e))?;

        Ok(Self {
            store,
            security,
            dummy_hash,
        })
    }

    /// Create a user and return a freshly issued token.
    ///
    /// Email is normalized before storage; the cycle length defaults to 28
    /// only when the request omits it. A duplicate email surfaces as the
    /// distinct `DuplicateEmail` error.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        request.email = normalize_email(&request.email);
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let password_hash = self
            .security
            .hash_password(&request.password)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            password_hash,
            name: request.name,
            birth_year: request.birth_year,
            average_cycle_length: request
                .average_cycle_length
                .unwrap_or(DEFAULT_CYCLE_LENGTH),
            created_at: Utc::now(),
        };

        let user = match self.store.insert(user).await {
            Ok(user) => user,
            Err(StoreError::DuplicateKey(_)) => return Err(AuthError::DuplicateEmail),
            Err(e) => return Err(anyhow!("Failed to create user: {}", e).into()),
        };

        tracing::info!(user_id = %user.id, "Registered new user");

        let (token, _expires_at) = self
            .security
            .issue_token(&user.email, Map::new())
            .map_err(|e| anyhow!("Failed to issue token: {}", e))?;

        Ok(AuthResponse {
            token,
            name: user.name,
        })
    }

    /// Verify credentials and return a freshly issued token.
    ///
    /// Unknown email and wrong password collapse into the same
    /// `InvalidCredentials` error, on the same latency path.
    pub async fn login(&self, mut request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request.email = normalize_email(&request.email);
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = match self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(|e| anyhow!("User lookup failed: {}", e))?
        {
            Some(user) => user,
            None => {
                let _ = self.security.verify_password(&request.password, &self.dummy_hash);
                tracing::warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let verified = self
            .security
            .verify_password(&request.password, &user.password_hash)
            .map_err(|e| anyhow!("Password verification failed: {}", e))?;

        if !verified {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        let (token, _expires_at) = self
            .security
            .issue_token(&user.email, Map::new())
            .map_err(|e| anyhow!("Failed to issue token: {}", e))?;

        Ok(AuthResponse {
            token,
            name: user.name,
        })
    }

    /// Validate a previously issued token, returning its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.security
            .validate_token(token)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Canonical email form: trimmed and lower-cased, applied before every store
/// lookup and write.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
