//! Port abstraction for the user record store and its errors.

use async_trait::async_trait;

use crate::domain::query::{SortEntry, UserFilter};
use crate::domain::user::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint (email) was violated.
        UniqueViolation { message: String } => "user repository uniqueness violation: {message}",
    }
}

/// A page request against the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListRequest {
    /// Number of matching records to skip.
    pub skip: i64,
    /// Maximum number of records to return.
    pub take: i64,
    /// Predicate over the full record set.
    pub filter: UserFilter,
    /// Multi-key ordering, earlier entries first.
    pub sort: Vec<SortEntry>,
    /// Also count all matching records, ignoring skip/take.
    pub require_total_count: bool,
}

/// One page of user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Records of this page, in requested order.
    pub data: Vec<User>,
    /// Count of all matching records when requested.
    pub total_count: Option<i64>,
}

/// CRUD primitives over the persistent user table.
///
/// Update and delete return `None` when no record exists at the identifier,
/// so callers can distinguish a missing row from an execution failure.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a filtered, sorted page of records.
    async fn list(&self, request: &UserListRequest) -> Result<UserPage, UserRepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a record by its unique email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new record; the store assigns the identifier and timestamps.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Overwrite the given fields of a record.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Delete a record, returning it.
    async fn delete(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Delete every record. Used by seed tooling only.
    async fn delete_all(&self) -> Result<usize, UserRepositoryError>;
}
