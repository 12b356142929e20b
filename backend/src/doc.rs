//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP endpoints from the inbound layer, the domain
//! schemas they reference, and the bearer token security scheme. The
//! generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ApprovalStatus, Class, EnrollmentIntent, Error, ErrorCode, Payment, Role, User};
use crate::inbound::http::auth::{TokenRequestBody, TokenResponseBody};
use crate::inbound::http::classes::{EditClassBody, FeedbackBody, StatusBody, SubmitClassBody};
use crate::inbound::http::intents::CreateIntentBody;
use crate::inbound::http::payments::{
    ChargeIntentBody, ChargeIntentResponseBody, SettleBody, SettlementResponseBody,
};
use crate::inbound::http::users::{RegisterUserBody, RegisterUserResponseBody, RoleUpdateBody};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/token."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Course marketplace backend API",
        description = "HTTP interface for class browsing, enrollment, and settlement."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::issue_token,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::is_admin,
        crate::inbound::http::users::is_instructor,
        crate::inbound::http::users::update_role,
        crate::inbound::http::classes::list_classes,
        crate::inbound::http::classes::submit_class,
        crate::inbound::http::classes::list_my_classes,
        crate::inbound::http::classes::get_class,
        crate::inbound::http::classes::edit_class,
        crate::inbound::http::classes::set_class_status,
        crate::inbound::http::classes::set_class_feedback,
        crate::inbound::http::classes::list_instructors,
        crate::inbound::http::intents::create_intent,
        crate::inbound::http::intents::list_intents,
        crate::inbound::http::intents::get_intent,
        crate::inbound::http::intents::delete_intent,
        crate::inbound::http::payments::create_charge_intent,
        crate::inbound::http::payments::settle_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        Class,
        ApprovalStatus,
        EnrollmentIntent,
        Payment,
        Error,
        ErrorCode,
        TokenRequestBody,
        TokenResponseBody,
        RegisterUserBody,
        RegisterUserResponseBody,
        RoleUpdateBody,
        SubmitClassBody,
        EditClassBody,
        StatusBody,
        FeedbackBody,
        CreateIntentBody,
        ChargeIntentBody,
        ChargeIntentResponseBody,
        SettleBody,
        SettlementResponseBody,
    )),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User directory and roles"),
        (name = "classes", description = "Class catalog and approval"),
        (name = "intents", description = "Enrollment intents"),
        (name = "payments", description = "Charge intents and settlement"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_registers_every_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for expected in [
            "/api/v1/auth/token",
            "/api/v1/users",
            "/api/v1/users/admin/{email}",
            "/api/v1/users/instructor/{email}",
            "/api/v1/users/{email}/role",
            "/api/v1/classes",
            "/api/v1/classes/mine",
            "/api/v1/classes/{id}",
            "/api/v1/classes/{id}/status",
            "/api/v1/classes/{id}/feedback",
            "/api/v1/instructors",
            "/api/v1/intents",
            "/api/v1/intents/{id}",
            "/api/v1/payments/charge-intent",
            "/api/v1/payments",
            "/healthz/ready",
            "/healthz/live",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
