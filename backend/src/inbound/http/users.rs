//! User directory HTTP handlers.
//!
//! ```text
//! POST  /api/v1/users
//! GET   /api/v1/users
//! GET   /api/v1/users/admin/{email}
//! GET   /api/v1/users/instructor/{email}
//! PATCH /api/v1/users/{email}/role
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::UserRepositoryError;
use crate::domain::{Capability, Error, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

fn map_directory_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Request payload for first-login registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub display_name: String,
}

/// Response payload for registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponseBody {
    pub user: User,
    /// False when the email was already registered and nothing changed.
    pub created: bool,
}

/// Request payload for a role grant.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdateBody {
    #[schema(example = "instructor")]
    pub role: String,
}

/// Register a user on first login. Existing emails are a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tags = ["users"],
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = RegisterUserResponseBody),
        (status = 200, description = "Email already registered", body = RegisterUserResponseBody),
        (status = 400, description = "Malformed email"),
    )
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    body: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let email = parse_email(&body.email, FieldName::new("email"))?;

    let user = User {
        email: email.clone(),
        display_name: body.display_name,
        role: Role::Student,
        created_at: Utc::now(),
    };
    let created = state
        .users
        .insert_if_absent(&user)
        .await
        .map_err(map_directory_error)?;

    let user = if created {
        user
    } else {
        // Return the existing record, not the discarded draft.
        state
            .users
            .find_by_email(&email)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::internal(format!("user {email} vanished during registration")))?
    };

    let mut response = if created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(response.json(RegisterUserResponseBody { user, created }))
}

/// List every registered user. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tags = ["users"],
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>, bearer: Bearer) -> ApiResult<HttpResponse> {
    state.gate.authorize(bearer.token(), Capability::Admin).await?;
    let users = state.role_admin.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Self-scoped admin role lookup.
///
/// An identity/path mismatch yields `false`, not an error, so clients can
/// probe only their own role.
#[utoipa::path(
    get,
    path = "/api/v1/users/admin/{email}",
    tags = ["users"],
    params(("email" = String, Path, description = "Email to check")),
    responses(
        (status = 200, description = "Whether the email holds the admin role"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
#[get("/users/admin/{email}")]
pub async fn is_admin(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    let admin = state.gate.holds_role(&identity, &email, Role::Admin).await?;
    Ok(HttpResponse::Ok().json(json!({ "admin": admin })))
}

/// Self-scoped instructor role lookup.
#[utoipa::path(
    get,
    path = "/api/v1/users/instructor/{email}",
    tags = ["users"],
    params(("email" = String, Path, description = "Email to check")),
    responses(
        (status = 200, description = "Whether the email holds the instructor role"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
#[get("/users/instructor/{email}")]
pub async fn is_instructor(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    let instructor = state
        .gate
        .holds_role(&identity, &email, Role::Instructor)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "instructor": instructor })))
}

/// Grant the instructor or admin role. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{email}/role",
    tags = ["users"],
    params(("email" = String, Path, description = "User to promote")),
    request_body = RoleUpdateBody,
    responses(
        (status = 204, description = "Role updated"),
        (status = 400, description = "Unknown or ungrantable role"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such user"),
    )
)]
#[patch("/users/{email}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    body: web::Json<RoleUpdateBody>,
) -> ApiResult<HttpResponse> {
    state.gate.authorize(bearer.token(), Capability::Admin).await?;
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    let role: Role = body.role.parse().map_err(|_| {
        Error::invalid_request(format!("unknown role: {}", body.role)).with_details(json!({
            "field": "role",
            "value": body.role,
            "code": "unknown_role",
        }))
    })?;

    state.role_admin.promote(&email, role).await?;
    Ok(HttpResponse::NoContent().finish())
}
