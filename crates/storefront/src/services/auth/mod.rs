//! Authentication service.
//!
//! Email/password accounts with a single session slot. Passwords are
//! stored as argon2id PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use myshop_core::{Email, Membership, PasswordDigest};

use crate::db::{UserRepository, lock};
use crate::error::{AppError, Result};
use crate::filters::escape_html;
use crate::models::{CurrentUser, Session, User};
use crate::state::AppState;

/// Authentication service.
///
/// Handles signup, login and logout against the shared user list.
pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Register a new account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is empty.
    /// Returns `AppError::Validation` if the name is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        membership: Membership,
    ) -> Result<CurrentUser> {
        let email = Email::parse(email).map_err(AuthError::from)?;
        validate_password(password)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let mut users = lock(self.state.users(), "users")?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let user = User {
            id: self.state.ids().next_user_id(),
            name: escape_html(name),
            email,
            password: hash_password(password)?,
            membership,
        };

        let mut staged = users.clone();
        staged.push(user.clone());
        UserRepository::new(self.state.store())
            .save(&staged)
            .map_err(AuthError::from)?;
        *users = staged;
        drop(users);

        let current = CurrentUser::from(&user);
        self.set_session(Session::Authenticated(current.clone()))?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(current)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account has this email
    /// or the password is wrong.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        // An unparseable email cannot belong to any account.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = lock(self.state.users(), "users")?
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password)?;

        let current = CurrentUser::from(&user);
        self.set_session(Session::Authenticated(current.clone()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(current)
    }

    /// End the session. Logging out while anonymous is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the session lock is poisoned.
    pub fn logout(&self) -> Result<()> {
        self.set_session(Session::Anonymous)
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the session lock is poisoned.
    pub fn current_user(&self) -> Result<Option<CurrentUser>> {
        let session = lock(self.state.session(), "session")?;
        Ok(session.current_user().cloned())
    }

    fn set_session(&self, next: Session) -> Result<()> {
        *lock(self.state.session(), "session")? = next;
        Ok(())
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate password before hashing.
fn validate_password(password: &str) -> std::result::Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::WeakPassword("Password is required".to_string()));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> std::result::Result<PasswordDigest, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordDigest::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored digest.
fn verify_password(password: &str, digest: &PasswordDigest) -> std::result::Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(digest.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
