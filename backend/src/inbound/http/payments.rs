//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/v1/payments/charge-intent
//! POST /api/v1/payments
//! GET  /api/v1/payments?student=…
//! ```
//!
//! `charge-intent` asks the external gateway to open a charge; `POST
//! /payments` settles a charge the client already confirmed.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{PaymentGatewayError, PaymentRepositoryError};
use crate::domain::{
    Capability, ChargeRef, Error, Payment, SettlementRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email, parse_uuid};

const DEFAULT_CURRENCY: &str = "usd";

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    // Gateway failures are propagated, never retried.
    Error::upstream_payment(error.to_string())
}

fn map_ledger_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment ledger unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment ledger error: {message}"))
        }
    }
}

/// Request payload for opening a charge intent with the gateway.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeIntentBody {
    #[schema(example = 12000)]
    pub amount_cents: i64,
    /// ISO currency code; defaults to `usd`.
    pub currency: Option<String>,
}

/// Response payload carrying the gateway's client secret.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeIntentResponseBody {
    pub client_secret: String,
}

/// Request payload for settling a confirmed charge.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettleBody {
    #[schema(format = "uuid")]
    pub class_id: String,
    #[schema(format = "uuid")]
    pub intent_id: String,
    #[schema(example = 12000)]
    pub amount_cents: i64,
    #[schema(example = "pi_3MtwBwLkdIwHu7ix28a3tqPa")]
    pub charge_ref: String,
}

/// Response payload for a settlement.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponseBody {
    pub payment: Payment,
    pub available_seats: i32,
    pub enrolled_count: i32,
    /// True when this charge had already settled and the original payment is
    /// returned.
    pub replayed: bool,
}

/// Open a charge intent with the payment gateway.
#[utoipa::path(
    post,
    path = "/api/v1/payments/charge-intent",
    tags = ["payments"],
    request_body = ChargeIntentBody,
    responses(
        (status = 200, description = "Charge intent created", body = ChargeIntentResponseBody),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Missing or invalid token"),
        (status = 502, description = "Gateway failure"),
    )
)]
#[post("/payments/charge-intent")]
pub async fn create_charge_intent(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Json<ChargeIntentBody>,
) -> ApiResult<HttpResponse> {
    state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let body = body.into_inner();
    if body.amount_cents <= 0 {
        return Err(Error::invalid_request("amountCents must be positive"));
    }
    let currency = body.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);

    let intent = state
        .gateway
        .create_charge_intent(body.amount_cents, currency)
        .await
        .map_err(map_gateway_error)?;
    Ok(HttpResponse::Ok().json(ChargeIntentResponseBody {
        client_secret: intent.client_secret,
    }))
}

/// Settle a confirmed charge: record the payment, consume the intent, and
/// claim a seat, atomically.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tags = ["payments"],
    request_body = SettleBody,
    responses(
        (status = 201, description = "Settled", body = SettlementResponseBody),
        (status = 200, description = "Charge already settled; original returned",
            body = SettlementResponseBody),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Class or intent not found, or the intent \
            is held by another student"),
        (status = 409, description = "No seats available, or retries exhausted"),
    )
)]
#[post("/payments")]
pub async fn settle_payment(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Json<SettleBody>,
) -> ApiResult<HttpResponse> {
    let identity = state
        .gate
        .authorize(bearer.token(), Capability::Authenticated)
        .await?;
    let body = body.into_inner();
    let class_id = parse_uuid(&body.class_id, FieldName::new("classId"))?;
    let intent_id = parse_uuid(&body.intent_id, FieldName::new("intentId"))?;
    let charge_ref = ChargeRef::new(body.charge_ref)
        .map_err(|err| Error::invalid_request(format!("chargeRef: {err}")))?;

    let receipt = state
        .settlement
        .settle(SettlementRequest {
            student_email: identity.email,
            class_id,
            intent_id,
            amount_cents: body.amount_cents,
            charge_ref,
        })
        .await?;

    let mut response = if receipt.replayed {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    Ok(response.json(SettlementResponseBody {
        payment: receipt.payment,
        available_seats: receipt.available_seats,
        enrolled_count: receipt.enrolled_count,
        replayed: receipt.replayed,
    }))
}

/// Query parameters for the payment listing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentListQuery {
    pub student: Option<String>,
}

/// List the calling student's payments, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tags = ["payments"],
    params(("student" = String, Query, description = "Student email, must match the caller")),
    responses(
        (status = 200, description = "The student's payments", body = [Payment]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Querying another student's payments"),
    )
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    bearer: Bearer,
    query: web::Query<PaymentListQuery>,
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
    if identity.email != student {
        return Err(Error::forbidden(
            "payments may only be listed by their owner",
        ));
    }

    let payments = state
        .payments
        .list_for_student(&student)
        .await
        .map_err(map_ledger_error)?;
    Ok(HttpResponse::Ok().json(payments))
}
