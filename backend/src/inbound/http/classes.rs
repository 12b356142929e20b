//! Class catalog HTTP handlers.
//!
//! ```text
//! GET   /api/v1/classes
//! POST  /api/v1/classes
//! GET   /api/v1/classes/mine
//! GET   /api/v1/classes/{id}
//! PATCH /api/v1/classes/{id}
//! PATCH /api/v1/classes/{id}/status
//! PATCH /api/v1/classes/{id}/feedback
//! GET   /api/v1/instructors
//! ```
//!
//! `/classes/mine` must be registered before `/classes/{id}` so the literal
//! segment wins the route match.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{ApprovalStatus, Capability, Class, ClassEdit, ClassSubmission, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Request payload for a class submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClassBody {
    #[schema(example = "Violin for beginners")]
    pub title: String,
    pub image_url: Option<String>,
    #[schema(example = 12000)]
    pub price_cents: i64,
    #[schema(example = 10)]
    pub total_seats: i32,
}

/// Request payload for an instructor edit. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditClassBody {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i64>,
    pub total_seats: Option<i32>,
}

/// Request payload for an approval decision.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    #[schema(example = "approved")]
    pub status: String,
}

/// Request payload for admin feedback.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBody {
    pub feedback: String,
}

/// List all classes, most enrolled first. Public.
#[utoipa::path(
    get,
    path = "/api/v1/classes",
    tags = ["classes"],
    responses((status = 200, description = "All classes", body = [Class]))
)]
#[get("/classes")]
pub async fn list_classes(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let classes = state.catalog.list_classes().await?;
    Ok(HttpResponse::Ok().json(classes))
}

/// Submit a new class for approval. Instructor only.
#[utoipa::path(
    post,
    path = "/api/v1/classes",
    tags = ["classes"],
    request_body = SubmitClassBody,
    responses(
        (status = 201, description = "Class submitted pending approval", body = Class),
        (status = 400, description = "Invalid submission"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an instructor"),
    )
)]
#[post("/classes")]
pub async fn submit_class(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Json<SubmitClassBody>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Instructor)
        .await?;
    let body = body.into_inner();

    let class = state
        .catalog
        .submit_class(
            identity.email,
            ClassSubmission {
                title: body.title,
                image_url: body.image_url,
                price_cents: body.price_cents,
                total_seats: body.total_seats,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(class))
}

/// List the calling instructor's classes.
#[utoipa::path(
    get,
    path = "/api/v1/classes/mine",
    tags = ["classes"],
    responses(
        (status = 200, description = "The caller's classes", body = [Class]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an instructor"),
    )
)]
#[get("/classes/mine")]
pub async fn list_my_classes(
    state: web::Data<HttpState>,
    bearer: Bearer,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Instructor)
        .await?;
    let classes = state.catalog.list_my_classes(&identity.email).await?;
    Ok(HttpResponse::Ok().json(classes))
}

/// Single class lookup. Public.
#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}",
    tags = ["classes"],
    params(("id" = uuid::Uuid, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "The class", body = Class),
        (status = 404, description = "No such class"),
    )
)]
#[get("/classes/{id}")]
pub async fn get_class(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let class = state.catalog.get_class(id).await?;
    Ok(HttpResponse::Ok().json(class))
}

/// Edit an owned, still pending class. Instructor only.
#[utoipa::path(
    patch,
    path = "/api/v1/classes/{id}",
    tags = ["classes"],
    params(("id" = uuid::Uuid, Path, description = "Class identifier")),
    request_body = EditClassBody,
    responses(
        (status = 200, description = "Updated class", body = Class),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such class"),
        (status = 409, description = "Class is no longer editable"),
    )
)]
#[patch("/classes/{id}")]
pub async fn edit_class(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    body: web::Json<EditClassBody>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Instructor)
        .await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let body = body.into_inner();

    let class = state
        .catalog
        .edit_my_class(
            &identity.email,
            id,
            ClassEdit {
                title: body.title,
                image_url: body.image_url,
                price_cents: body.price_cents,
                total_seats: body.total_seats,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(class))
}

/// Approve or deny a class submission. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/classes/{id}/status",
    tags = ["classes"],
    params(("id" = uuid::Uuid, Path, description = "Class identifier")),
    request_body = StatusBody,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Unknown or unsettable status"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such class"),
    )
)]
#[patch("/classes/{id}/status")]
pub async fn set_class_status(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    body: web::Json<StatusBody>,
) -> ApiResult<HttpResponse> {
    state.gate.authorize(bearer.token(), Capability::Admin).await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let status: ApprovalStatus = body.status.parse().map_err(|_| {
        Error::invalid_request(format!("unknown approval status: {}", body.status)).with_details(
            json!({
                "field": "status",
                "value": body.status,
                "code": "unknown_status",
            }),
        )
    })?;

    state.role_admin.set_class_approval(id, status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach admin feedback to a class submission. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/classes/{id}/feedback",
    tags = ["classes"],
    params(("id" = uuid::Uuid, Path, description = "Class identifier")),
    request_body = FeedbackBody,
    responses(
        (status = 204, description = "Feedback stored"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such class"),
    )
)]
#[patch("/classes/{id}/feedback")]
pub async fn set_class_feedback(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    body: web::Json<FeedbackBody>,
) -> ApiResult<HttpResponse> {
    state.gate.authorize(bearer.token(), Capability::Admin).await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;

    state
        .role_admin
        .set_class_feedback(id, &body.feedback)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List instructors for the public storefront.
#[utoipa::path(
    get,
    path = "/api/v1/instructors",
    tags = ["classes"],
    responses((status = 200, description = "All instructors"))
)]
#[get("/instructors")]
pub async fn list_instructors(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let instructors = state.role_admin.list_instructors().await?;
    Ok(HttpResponse::Ok().json(instructors))
}
