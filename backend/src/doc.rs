//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: the users endpoints, the health probes, and the shared
//! request/response schemas. The generated document backs Swagger UI in
//! debug builds.

use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User records API",
        description = "CRUD, batch editing, and email checks over the user records table."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::batch_users,
        crate::inbound::http::users::check_email,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::User,
        crate::inbound::http::users_dto::CreateUserRequest,
        crate::inbound::http::users_dto::UpdateUserRequest,
        crate::inbound::http::users_dto::UserListResponse,
        crate::inbound::http::users_dto::BatchChangeRequest,
        crate::inbound::http::users_dto::CheckEmailResponse,
    )),
    tags(
        (name = "users", description = "User record management"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
