//! Full HTTP surface exercised in-process over the in-memory store.

use actix_web::{test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use backend::domain::ports::{Identity, TokenService, UserRepository};
use backend::domain::{Email, Role, User};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::auth::JwtTokenService;
use backend::server::{build_app, build_memory_state};

const SECRET: &[u8] = b"integration-test-secret";

async fn seed_user(state: &HttpState, email: &str, name: &str, role: Role) {
    let user = User {
        email: Email::new(email).expect("valid email"),
        display_name: name.to_owned(),
        role,
        created_at: Utc::now(),
    };
    state
        .users
        .insert_if_absent(&user)
        .await
        .expect("seed user");
}

fn token_for(state: &HttpState, email: &str) -> String {
    state
        .tokens
        .issue(&Identity {
            email: Email::new(email).expect("valid email"),
            display_name: None,
        })
        .expect("issue token")
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! spawn_app {
    () => {{
        let state = build_memory_state(SECRET);
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(state.clone()),
        ))
        .await;
        (app, state)
    }};
}

#[actix_web::test]
async fn registration_is_idempotent_per_email() {
    let (app, _state): (_, HttpState) = spawn_app!();

    let body = json!({ "email": "ada@example.com", "displayName": "Ada" });
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 201);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["created"], json!(true));
    assert_eq!(created["user"]["role"], json!("student"));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let replayed: Value = test::read_body_json(res).await;
    assert_eq!(replayed["created"], json!(false));
}

#[actix_web::test]
async fn admin_routes_reject_missing_and_unprivileged_callers() {
    let (app, state) = spawn_app!();
    seed_user(&state, "student@example.com", "Sam", Role::Student).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(res.status(), 401);

    let student = token_for(&state, "student@example.com");
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&student))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 403);

    seed_user(&state, "root@example.com", "Root", Role::Admin).await;
    let admin = token_for(&state, "root@example.com");
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
}

#[actix_web::test]
async fn expired_and_garbage_tokens_are_unauthorized() {
    let (app, _state) = spawn_app!();

    let expired = JwtTokenService::new(SECRET)
        .with_ttl(Duration::minutes(-2))
        .issue(&Identity {
            email: Email::new("ada@example.com").expect("valid email"),
            display_name: None,
        })
        .expect("issue token");
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/intents?student=ada@example.com")
            .insert_header(bearer(&expired))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 401);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/intents?student=ada@example.com")
            .insert_header(bearer("not-a-token"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 401);
}

#[actix_web::test]
async fn responses_carry_a_trace_id_header() {
    let (app, _state) = spawn_app!();

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/classes").to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("Trace-Id"));
}

#[actix_web::test]
async fn charge_intent_uses_the_configured_gateway() {
    let (app, state) = spawn_app!();
    seed_user(&state, "student@example.com", "Sam", Role::Student).await;
    let student = token_for(&state, "student@example.com");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/payments/charge-intent")
            .insert_header(bearer(&student))
            .set_json(json!({ "amountCents": 12000 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["clientSecret"], json!("fixture_secret_usd_12000"));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/payments/charge-intent")
            .insert_header(bearer(&student))
            .set_json(json!({ "amountCents": 0 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 400);
}

// The whole marketplace flow driven over HTTP: registration, promotion,
// submission, approval, intent, settlement, replay, ledger listing.
#[actix_web::test]
async fn marketplace_flow_over_http() {
    let (app, state) = spawn_app!();
    seed_user(&state, "root@example.com", "Root", Role::Admin).await;
    seed_user(&state, "ada@example.com", "Ada", Role::Student).await;
    seed_user(&state, "student@example.com", "Sam", Role::Student).await;
    let admin = token_for(&state, "root@example.com");
    let ada = token_for(&state, "ada@example.com");
    let student = token_for(&state, "student@example.com");

    // Students cannot submit classes.
    let submission = json!({
        "title": "Violin for beginners",
        "priceCents": 12000,
        "totalSeats": 2,
    });
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(bearer(&ada))
            .set_json(&submission)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 403);

    // Promote, then submit.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/ada@example.com/role")
            .insert_header(bearer(&admin))
            .set_json(json!({ "role": "instructor" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 204);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/instructor/ada@example.com")
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["instructor"], json!(true));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(bearer(&ada))
            .set_json(&submission)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 201);
    let class: Value = test::read_body_json(res).await;
    assert_eq!(class["status"], json!("pending"));
    let class_id = class["id"].as_str().expect("class id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/classes/{class_id}/status"))
            .insert_header(bearer(&admin))
            .set_json(json!({ "status": "approved" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 204);

    // Intent creation is open to visitors.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/intents")
            .set_json(json!({ "email": "student@example.com", "classId": class_id }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 201);
    let intent: Value = test::read_body_json(res).await;
    let intent_id = intent["id"].as_str().expect("intent id").to_owned();

    // Settle the confirmed charge.
    let settle = json!({
        "classId": class_id,
        "intentId": intent_id,
        "amountCents": 12000,
        "chargeRef": "pi_http_flow",
    });
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/payments")
            .insert_header(bearer(&student))
            .set_json(&settle)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 201);
    let receipt: Value = test::read_body_json(res).await;
    assert_eq!(receipt["replayed"], json!(false));
    assert_eq!(receipt["availableSeats"], json!(1));
    assert_eq!(receipt["enrolledCount"], json!(1));

    // Replaying the same charge returns the original payment, 200.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/payments")
            .insert_header(bearer(&student))
            .set_json(&settle)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let replay: Value = test::read_body_json(res).await;
    assert_eq!(replay["replayed"], json!(true));
    assert_eq!(replay["payment"]["id"], receipt["payment"]["id"]);
    assert_eq!(replay["availableSeats"], json!(1));

    // Cancelling the consumed intent is 404.
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/intents/{intent_id}"))
            .insert_header(bearer(&student))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 404);

    // Ledger listing is owner-scoped.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/payments?student=student@example.com")
            .insert_header(bearer(&student))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let payments: Value = test::read_body_json(res).await;
    assert_eq!(payments.as_array().map(Vec::len), Some(1));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/payments?student=student@example.com")
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 403);

    // The catalog reflects the settlement.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), 200);
    let class: Value = test::read_body_json(res).await;
    assert_eq!(class["availableSeats"], json!(1));
    assert_eq!(class["enrolledCount"], json!(1));
}
