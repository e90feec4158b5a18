//! Record-management backend: CRUD endpoints over the `users` table for an
//! editable data grid with remote paging, filtering, sorting, and batch
//! editing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
