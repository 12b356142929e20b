//! Token issuance HTTP handler.
//!
//! ```text
//! POST /api/v1/auth/token
//! ```
//!
//! Issues a time-bounded bearer token for the posted claims. Identity proof
//! is delegated to the front-end login flow; this endpoint only signs what it
//! is given, mirroring the storefront's first-party authentication.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{Identity, TokenServiceError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

/// Request payload for token issuance.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub display_name: Option<String>,
}

/// Response payload carrying the signed token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponseBody {
    pub token: String,
}

fn map_issue_error(error: TokenServiceError) -> Error {
    // Issuing can only fail at the signing step.
    Error::internal(format!("token issuance failed: {error}"))
}

/// Issue a bearer token for the posted identity claims.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tags = ["auth"],
    request_body = TokenRequestBody,
    responses(
        (status = 200, description = "Token issued", body = TokenResponseBody),
        (status = 400, description = "Malformed email"),
    )
)]
#[post("/auth/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    body: web::Json<TokenRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let email = parse_email(&body.email, FieldName::new("email"))?;
    let identity = Identity {
        email,
        display_name: body.display_name,
    };

    let token = state.tokens.issue(&identity).map_err(map_issue_error)?;
    Ok(HttpResponse::Ok().json(TokenResponseBody { token }))
}
