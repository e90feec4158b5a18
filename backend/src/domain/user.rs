//! User record types.
//!
//! Purpose: define the `users` aggregate as the rest of the application sees
//! it. Identifiers are store-assigned and immutable; timestamps are managed
//! by the store (`created_at` set on insert, `updated_at` refreshed by a
//! trigger on every mutation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    #[schema(example = 42)]
    pub id: UserId,
    /// Globally unique email address.
    #[schema(example = "ada.lovelace@example.com")]
    pub email: String,
    /// Given name.
    #[schema(example = "Adaline")]
    pub first_name: String,
    /// Family name.
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Job position.
    #[schema(example = "Principal Engineer")]
    pub position: String,
    /// Phone number as a plain integer.
    #[schema(example = 55512345_i64)]
    pub phone: i64,
    /// Set once when the record is created.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Attributes of a user to be created. Identifier and timestamps are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email address; must be unique across all live records.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Job position.
    pub position: String,
    /// Phone number.
    pub phone: i64,
}

/// Partial update of a user record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement job position.
    pub position: Option<String>,
    /// Replacement phone number.
    pub phone: Option<i64>,
}

impl UserChanges {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.position.is_none()
            && self.phone.is_none()
    }
}

/// Check an email address against the `local@domain.tld` shape.
///
/// Mirrors the grid client's expectation: a non-empty local part, a single
/// `@`, a domain with a non-empty label before and after the final dot, and
/// no whitespace anywhere. Deliverability is not checked.
///
/// # Examples
/// ```
/// use backend::domain::is_valid_email_shape;
///
/// assert!(is_valid_email_shape("ada@example.com"));
/// assert!(!is_valid_email_shape("ada@example"));
/// assert!(!is_valid_email_shape("ada lovelace@example.com"));
/// ```
pub fn is_valid_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
