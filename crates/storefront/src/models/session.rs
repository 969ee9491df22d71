//! Session-related types.

use serde::Serialize;

use myshop_core::{Email, Membership, UserId};

use super::user::User;

/// The logged-in user held in the session slot.
///
/// Never persisted: a restart always begins anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    /// User's ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Membership tier.
    pub membership: Membership,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            membership: user.membership,
        }
    }
}

/// Who is using the storefront right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A user logged in or just signed up.
    Authenticated(CurrentUser),
}

impl Session {
    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
