use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`AuthService`](super::AuthService) operations.
///
/// The display text of the validation and credential variants is exactly what
/// the API reports to the caller. `InvalidCredentials` deliberately covers
/// both the unknown-identifier and wrong-password cases with one message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Identifier and password are required")]
    MissingCredentials,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("credential store failure")]
    Store(#[from] StoreError),
}
