//! Users API handlers.
//!
//! The seven routes consumed by the grid client:
//!
//! ```text
//! GET    /users?skip=&take=&filter=&sort=&requireTotalCount=
//! GET    /users/{id}
//! POST   /users
//! PATCH  /users/{id}
//! DELETE /users/{id}
//! POST   /users/batch
//! GET    /users/check-email/{email}
//! ```
//!
//! Handlers parse and validate request shapes, delegate to the record
//! service, and serialise results; no business decisions are made here.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::{User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users_dto::{
    BatchChangeRequest, CheckEmailParams, CheckEmailResponse, CreateUserRequest, ListParams,
    UpdateUserRequest, UserListResponse,
};

/// List users with remote paging, filtering, and sorting.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("skip" = Option<i64>, Query, description = "Number of records to skip"),
        ("take" = Option<i64>, Query, description = "Number of records to take"),
        ("filter" = Option<String>, Query, description = "Filter expression as JSON"),
        ("sort" = Option<String>, Query, description = "Sort expression as JSON"),
        ("requireTotalCount" = Option<String>, Query, description = "Set to \"true\" to count all matches")
    ),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<UserListResponse>> {
    let request = params.into_inner().into_request()?;
    let page = state.users.list(&request).await?;
    Ok(web::Json(UserListResponse::new(page.data, page.total_count)))
}

/// Check that an email is well-formed and not taken by another record.
#[utoipa::path(
    get,
    path = "/users/check-email/{email}",
    params(
        ("email" = String, Path, description = "Email address to check"),
        ("excludeId" = Option<i32>, Query, description = "Record whose own email should not count as taken")
    ),
    responses(
        (status = 200, description = "Email is available", body = CheckEmailResponse),
        (status = 400, description = "Invalid or taken email", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "checkEmail"
)]
#[get("/users/check-email/{email}")]
pub async fn check_email(
    state: web::Data<HttpState>,
    email: web::Path<String>,
    params: web::Query<CheckEmailParams>,
) -> ApiResult<web::Json<CheckEmailResponse>> {
    let exclude = params.exclude_id.map(UserId::new);
    state
        .users
        .check_email_available(&email.into_inner(), exclude)
        .await?;
    Ok(web::Json(CheckEmailResponse {
        message: "Email is available.".into(),
    }))
}

/// Apply a list of insert/update/remove changes in order.
///
/// Best-effort: the first failing change aborts the call and earlier changes
/// stay committed. On success the input list is echoed back; clients
/// re-fetch to observe effects.
#[utoipa::path(
    post,
    path = "/users/batch",
    request_body = Vec<BatchChangeRequest>,
    responses(
        (status = 200, description = "All changes applied; input echoed", body = Vec<BatchChangeRequest>),
        (status = 400, description = "Invalid change shape or constraint violation", body = crate::domain::Error),
        (status = 404, description = "A change referenced a missing record", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "batchUsers"
)]
#[post("/users/batch")]
pub async fn batch_users(
    state: web::Data<HttpState>,
    payload: web::Json<Vec<BatchChangeRequest>>,
) -> ApiResult<web::Json<Vec<BatchChangeRequest>>> {
    let requests = payload.into_inner();
    let changes = requests
        .iter()
        .map(BatchChangeRequest::to_domain)
        .collect::<Result<Vec<_>, _>>()?;
    state.users.batch_apply(changes).await?;
    Ok(web::Json(requests))
}

/// Fetch one user by identifier.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "User not found", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.get(UserId::new(id.into_inner())).await?;
    Ok(web::Json(user))
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "The created user", body = User),
        (status = 400, description = "Invalid request or email in use", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = payload.into_inner().into_new_user()?;
    let created = state.users.create(&new_user).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Overwrite fields of an existing user.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 400, description = "Invalid request or email in use", body = crate::domain::Error),
        (status = 404, description = "User not found", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let changes = payload.into_inner().into_changes()?;
    let updated = state
        .users
        .update(UserId::new(id.into_inner()), &changes)
        .await?;
    Ok(web::Json(updated))
}

/// Delete a user, returning the deleted record.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The deleted user", body = User),
        (status = 404, description = "User not found", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<User>> {
    let deleted = state.users.remove(UserId::new(id.into_inner())).await?;
    Ok(web::Json(deleted))
}

/// Register the users routes on a service config.
///
/// Registration order matters: the static `check-email` and `batch` segments
/// must precede the `{id}` matcher.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(check_email)
        .service(batch_users)
        .service(list_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
