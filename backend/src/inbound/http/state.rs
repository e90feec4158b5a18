//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the record service and remain testable with stub repositories.

use std::sync::Arc;

use crate::domain::UsersService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The record service behind the `/users` endpoints.
    pub users: Arc<UsersService>,
}

impl HttpState {
    /// Bundle the record service for injection into handlers.
    pub fn new(users: Arc<UsersService>) -> Self {
        Self { users }
    }
}
