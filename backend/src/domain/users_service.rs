//! Record service for user CRUD, batch editing, and email checks.
//!
//! Orchestrates the [`UserRepository`] port and owns the mapping from
//! persistence failures to domain error outcomes. Every operation is a
//! single request/response; no state is retained between calls.

use std::sync::Arc;

use tracing::debug;

use super::error::Error;
use super::ports::{UserListRequest, UserPage, UserRepository, UserRepositoryError};
use super::user::{NewUser, User, UserChanges, UserId, is_valid_email_shape};

/// One element of a batch submission from the grid's batch editing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchChange {
    /// Create a new record; the store assigns the identifier.
    Insert {
        /// Attributes of the record to create.
        data: NewUser,
    },
    /// Overwrite fields of the record at `key`.
    Update {
        /// Identifier of the record to change.
        key: UserId,
        /// Fields to overwrite.
        changes: UserChanges,
    },
    /// Delete the record at `key`.
    Remove {
        /// Identifier of the record to delete.
        key: UserId,
    },
}

/// Application service over the user record store.
///
/// The repository handle is injected; the service holds no other state.
#[derive(Clone)]
pub struct UsersService {
    repository: Arc<dyn UserRepository>,
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::UniqueViolation { .. } => {
            Error::invalid_request("email is already in use")
        }
    }
}

impl UsersService {
    /// Create a service over the given repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Fetch a page of records matching the request's filter, in its sort
    /// order, with the total match count when requested.
    pub async fn list(&self, request: &UserListRequest) -> Result<UserPage, Error> {
        self.repository
            .list(request)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch one record by identifier.
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user with id {id} not found")))
    }

    /// Create a record. An email collision surfaces as an invalid request;
    /// the violated constraint is reported, not the raw store error.
    pub async fn create(&self, user: &NewUser) -> Result<User, Error> {
        self.repository
            .insert(user)
            .await
            .map_err(map_repository_error)
    }

    /// Overwrite the given fields of the record at `id`.
    pub async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, Error> {
        self.repository
            .update(id, changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user with id {id} not found")))
    }

    /// Delete the record at `id`, returning it.
    pub async fn remove(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user with id {id} not found")))
    }

    /// Apply a heterogeneous list of changes in list order.
    ///
    /// Best-effort and sequential: the changes are not wrapped in a
    /// transaction, and the first failure aborts the call leaving prior
    /// changes committed. Update and remove look the key up first so a
    /// missing record aborts before any store mutation for that change.
    /// Returns the input list unchanged; callers re-fetch to observe
    /// effects.
    pub async fn batch_apply(&self, changes: Vec<BatchChange>) -> Result<Vec<BatchChange>, Error> {
        for change in &changes {
            match change {
                BatchChange::Insert { data } => {
                    let created = self.create(data).await?;
                    debug!(id = %created.id, "batch insert applied");
                }
                BatchChange::Update { key, changes } => {
                    self.require_exists(*key).await?;
                    self.update(*key, changes).await?;
                    debug!(id = %key, "batch update applied");
                }
                BatchChange::Remove { key } => {
                    self.require_exists(*key).await?;
                    self.remove(*key).await?;
                    debug!(id = %key, "batch remove applied");
                }
            }
        }
        Ok(changes)
    }

    /// Check that `email` is well-formed and not held by another record.
    ///
    /// `exclude` carries the identifier of the record being edited so its
    /// own unchanged email does not count as taken.
    pub async fn check_email_available(
        &self,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<(), Error> {
        if !is_valid_email_shape(email) {
            return Err(Error::invalid_request("invalid email format"));
        }

        let existing = self
            .repository
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?;

        match existing {
            Some(user) if exclude != Some(user.id) => {
                Err(Error::invalid_request("email is already in use"))
            }
            _ => Ok(()),
        }
    }

    async fn require_exists(&self, id: UserId) -> Result<(), Error> {
        self.get(id).await.map(|_| ())
    }
}
