//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! A thin adapter: translates between Diesel rows and domain types and maps
//! database errors to the port's error enum. No business logic lives here.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserListRequest, UserPage, UserRepository, UserRepositoryError};
use crate::domain::{NewUser, User, UserChanges, UserId};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;
use super::user_query::{apply_sort, filter_predicate};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to the port's connection error.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to the port's error enum.
///
/// Unique violations keep their own variant so the service can report the
/// email collision instead of a generic failure.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserRepositoryError::unique_violation(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => UserRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserRepositoryError::query("database query error"),
        _ => UserRepositoryError::query("database error"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self, request: &UserListRequest) -> Result<UserPage, UserRepositoryError> {
        use diesel::pg::Pg;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = users::table.into_boxed::<Pg>();
        if let Some(predicate) = filter_predicate(&request.filter) {
            query = query.filter(predicate);
        }
        query = apply_sort(query, &request.sort);

        let rows: Vec<UserRow> = query
            .offset(request.skip)
            .limit(request.take)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // The total ignores skip/take but honours the same predicate.
        let total_count = if request.require_total_count {
            let mut count_query = users::table.count().into_boxed::<Pg>();
            if let Some(predicate) = filter_predicate(&request.filter) {
                count_query = count_query.filter(predicate);
            }
            let total: i64 = count_query
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            Some(total)
        } else {
            None
        };

        Ok(UserPage {
            data: rows.into_iter().map(User::from).collect(),
            total_count,
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // `updated_at` is refreshed by the table trigger, not here.
        let row: Option<UserRow> = diesel::update(users::table.find(id.value()))
            .set(UserChangeset::from(changes))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::delete(users::table.find(id.value()))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn delete_all(&self) -> Result<usize, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(users::table)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
