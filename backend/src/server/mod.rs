//! Server construction and middleware wiring.

mod config;

use std::sync::Arc;

pub use config::{PaymentGatewayConfig, ServerConfig};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{FixturePaymentGateway, PaymentGateway};
use crate::domain::{
    AuthorizationGate, CatalogService, EnrollmentService, RoleAdminService, SettlementService,
};
use crate::inbound::http::auth::issue_token;
use crate::inbound::http::classes::{
    edit_class, get_class, list_classes, list_instructors, list_my_classes, set_class_feedback,
    set_class_status, submit_class,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::intents::{create_intent, delete_intent, get_intent, list_intents};
use crate::inbound::http::payments::{create_charge_intent, list_payments, settle_payment};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{is_admin, is_instructor, list_users, register_user, update_role};
use crate::middleware::Trace;
use crate::outbound::auth::JwtTokenService;
use crate::outbound::payments::HttpPaymentGateway;
use crate::outbound::persistence::{
    DieselClassRepository, DieselIntentRepository, DieselPaymentRepository, DieselSettlementUnit,
    DieselUserRepository, MemoryStore,
};

/// Build the handler state from configuration.
///
/// Database-backed adapters are used when a pool is available; otherwise the
/// shared in-memory store serves every port, which is what integration tests
/// and credential-less development runs rely on.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let tokens = Arc::new(JwtTokenService::new(&config.token_secret));

    let gateway: Arc<dyn PaymentGateway> = match &config.payment {
        Some(payment) => Arc::new(HttpPaymentGateway::new(
            payment.api_base.clone(),
            payment.secret_key.clone(),
        )),
        None => Arc::new(FixturePaymentGateway),
    };

    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let classes = Arc::new(DieselClassRepository::new(pool.clone()));
            let intents = Arc::new(DieselIntentRepository::new(pool.clone()));
            let payments = Arc::new(DieselPaymentRepository::new(pool.clone()));
            let unit = Arc::new(DieselSettlementUnit::new(pool.clone()));
            HttpState {
                gate: AuthorizationGate::new(tokens.clone(), users.clone()),
                catalog: CatalogService::new(classes.clone()),
                enrollment: EnrollmentService::new(intents.clone()),
                role_admin: RoleAdminService::new(users.clone(), classes.clone()),
                settlement: SettlementService::new(classes, intents, payments.clone(), unit),
                tokens,
                users,
                payments,
                gateway,
            }
        }
        None => {
            let store = Arc::new(MemoryStore::new());
            HttpState {
                gate: AuthorizationGate::new(tokens.clone(), store.clone()),
                catalog: CatalogService::new(store.clone()),
                enrollment: EnrollmentService::new(store.clone()),
                role_admin: RoleAdminService::new(store.clone(), store.clone()),
                settlement: SettlementService::new(
                    store.clone(),
                    store.clone(),
                    store.clone(),
                    store.clone(),
                ),
                tokens,
                users: store.clone(),
                payments: store,
                gateway,
            }
        }
    }
}

/// Assemble the application with every route mounted.
///
/// Public so integration tests can drive the full HTTP surface in-process.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Literal segments before parameterised ones: /classes/mine precedes
    // /classes/{id}.
    let api = web::scope("/api/v1")
        .service(issue_token)
        .service(register_user)
        .service(list_users)
        .service(is_admin)
        .service(is_instructor)
        .service(update_role)
        .service(list_classes)
        .service(submit_class)
        .service(list_my_classes)
        .service(get_class)
        .service(edit_class)
        .service(set_class_status)
        .service(set_class_feedback)
        .service(list_instructors)
        .service(create_intent)
        .service(list_intents)
        .service(get_intent)
        .service(delete_intent)
        .service(create_charge_intent)
        .service(settle_payment)
        .service(list_payments);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Build in-memory handler state for tests and tooling.
#[must_use]
pub fn build_memory_state(token_secret: &[u8]) -> HttpState {
    build_http_state(&ServerConfig::new(
        ([127, 0, 0, 1], 0).into(),
        token_secret.to_vec(),
    ))
}
