//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the domain's `UserRepository` port backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types; query translation lives in `user_query`.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Strongly typed errors**: all database errors are mapped to the port's
//!   error enum before they leave this module.

mod diesel_user_repository;
pub mod migrate;
mod models;
mod pool;
mod schema;
mod user_query;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
