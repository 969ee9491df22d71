//! User domain types.

use serde::{Deserialize, Serialize};

use myshop_core::{Email, Membership, PasswordDigest, UserId};

/// A registered account, as stored under the `users` key.
///
/// There is no separate seller role: any user may list products, and the
/// listing records them as its seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, HTML-escaped at signup.
    pub name: String,
    /// Login email, unique across users.
    pub email: Email,
    /// Argon2id hash of the password.
    pub password: PasswordDigest,
    /// Membership tier chosen at signup.
    #[serde(default)]
    pub membership: Membership,
}
