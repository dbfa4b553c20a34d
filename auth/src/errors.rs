use thiserror::Error;

/// Failures surfaced to the caller of the authentication service.
///
/// Transport-level status mapping (400/409/401) is the caller's concern; this
/// crate only guarantees the kinds stay distinct. `Internal` deliberately
/// carries no detail in its display form.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    // One message for "no such user" and "wrong password": different texts
    // would let a caller enumerate registered emails.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}
