//! Domain primitives and services.
//!
//! Purpose: define the strongly typed user aggregate, the filter/sort
//! expressions behind remote grid queries, the record service, and the
//! transport-agnostic error payload. Inbound and outbound adapters depend on
//! this module, never the other way round.

pub mod error;
pub mod ports;
pub mod query;
pub mod user;
pub mod users_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::query::{
    FieldFilter, FilterOp, FilterValue, SortEntry, UserField, UserFilter, sort_from_wire,
};
pub use self::user::{NewUser, User, UserChanges, UserId, is_valid_email_shape};
pub use self::users_service::{BatchChange, UsersService};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
