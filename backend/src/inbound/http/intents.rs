//! Enrollment intent HTTP handlers.
//!
//! ```text
//! POST   /api/v1/intents
//! GET    /api/v1/intents?student=…
//! GET    /api/v1/intents/{id}
//! DELETE /api/v1/intents/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Capability, EnrollmentIntent, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email, parse_uuid};

/// Request payload for recording a class selection.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentBody {
    #[schema(example = "student@example.com")]
    pub email: String,
    #[schema(format = "uuid")]
    pub class_id: String,
}

/// Query parameters for the intent listing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IntentListQuery {
    pub student: Option<String>,
}

/// Record a tentative class selection. Open to unauthenticated visitors.
#[utoipa::path(
    post,
    path = "/api/v1/intents",
    tags = ["intents"],
    request_body = CreateIntentBody,
    responses(
        (status = 201, description = "Intent recorded", body = EnrollmentIntent),
        (status = 400, description = "Malformed email or class id"),
    )
)]
#[post("/intents")]
pub async fn create_intent(
    state: web::Data<HttpState>,
    body: web::Json<CreateIntentBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let email = parse_email(&body.email, FieldName::new("email"))?;
    let class_id = parse_uuid(&body.class_id, FieldName::new("classId"))?;

    let intent = state.enrollment.create_intent(email, class_id).await?;
    Ok(HttpResponse::Created().json(intent))
}

/// List the calling student's intents.
#[utoipa::path(
    get,
    path = "/api/v1/intents",
    tags = ["intents"],
    params(("student" = String, Query, description = "Student email, must match the caller")),
    responses(
        (status = 200, description = "The student's intents", body = [EnrollmentIntent]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Querying another student's intents"),
    )
)]
#[get("/intents")]
pub async fn list_intents(
    state: web::Data<HttpState>,
    bearer: Bearer,
    query: web::Query<IntentListQuery>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let student = query
        .student
        .as_deref()
        .ok_or_else(|| Error::invalid_request("student query parameter is required"))?;
    let student = parse_email(student, FieldName::new("student"))?;

    let intents = state.enrollment.list_intents(&identity, &student).await?;
    Ok(HttpResponse::Ok().json(intents))
}

/// Single intent lookup, owner only.
#[utoipa::path(
    get,
    path = "/api/v1/intents/{id}",
    tags = ["intents"],
    params(("id" = uuid::Uuid, Path, description = "Intent identifier")),
    responses(
        (status = 200, description = "The intent", body = EnrollmentIntent),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such intent"),
    )
)]
#[get("/intents/{id}")]
pub async fn get_intent(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;

    let intent = state.enrollment.get_intent(id).await?;
    if intent.student_email != identity.email {
        return Err(Error::forbidden("intent belongs to another student"));
    }
    Ok(HttpResponse::Ok().json(intent))
}

/// Cancel an intent, owner only.
///
/// An intent already consumed by settlement is gone; cancelling it reports
/// 404 and never touches seat counters.
#[utoipa::path(
    delete,
    path = "/api/v1/intents/{id}",
    tags = ["intents"],
    params(("id" = uuid::Uuid, Path, description = "Intent identifier")),
    responses(
        (status = 204, description = "Intent cancelled"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such intent"),
    )
)]
#[delete("/intents/{id}")]
pub async fn delete_intent(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;

    let intent = state.enrollment.get_intent(id).await?;
    if intent.student_email != identity.email {
        return Err(Error::forbidden("intent belongs to another student"));
    }
    state.enrollment.delete_intent(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
