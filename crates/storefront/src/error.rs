//! Unified error handling.
//!
//! Every public service operation returns `Result<T, AppError>`. Callers that
//! only need the category branch on [`AppError::kind`]; anything shown to a
//! shopper goes through [`AppError::user_message`], which never exposes
//! storage internals.

use thiserror::Error;

use myshop_core::PriceError;

use crate::db::StorageError;
use crate::services::auth::AuthError;
use crate::services::checkout::CardError;

/// Broad category of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced product does not exist.
    NotFound,
    /// Uniqueness violated (duplicate email).
    Conflict,
    /// Login failed.
    Unauthorized,
    /// Caller may not act on the resource.
    Forbidden,
    /// Input rejected.
    Validation,
    /// Persistence failed.
    Storage,
    /// Anything else that should not happen.
    Internal,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Card details failed validation.
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    /// Submitted price is unusable.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User may not perform the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The category this error falls into.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) | Self::Auth(AuthError::Storage(_)) => ErrorKind::Storage,
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthorized(_) => {
                ErrorKind::Unauthorized
            }
            Self::Auth(AuthError::UserAlreadyExists) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::Auth(AuthError::InvalidEmail(_) | AuthError::WeakPassword(_))
            | Self::Card(_)
            | Self::Price(_)
            | Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Auth(AuthError::PasswordHash) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_)
            | Self::Internal(_)
            | Self::Auth(AuthError::Storage(_) | AuthError::PasswordHash) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(AuthError::UserAlreadyExists) => "Email already registered".to_string(),
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
            Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
            Self::Card(err) => err.to_string(),
            Self::Price(err) => err.to_string(),
            Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Validation(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
