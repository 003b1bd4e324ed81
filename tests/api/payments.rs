use reqwest::StatusCode;

use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use hackathon_server::model::{NewRegistration, RegistrationDraft};

use crate::helpers::{intent_json, TestApp};

#[tokio::test]
async fn intent_creation_converts_to_minor_units() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(body_string_contains("amount=1000"))
        .and(body_string_contains("automatic_payment_methods"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(intent_json("requires_payment_method")),
        )
        .expect(1)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .payment_intent_create(&serde_json::json!({
            "amount": 10.0,
            "currency": "usd",
            "description": "Premium Hackathon Registration",
            "metadata": { "registration_id": "reg-1" },
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("pi_123_secret_abc", body["client_secret"]);
    assert_eq!("pi_123", body["payment_intent_id"]);
}

#[tokio::test]
async fn currency_is_lowercased_before_the_processor() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(body_string_contains("currency=usd"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(intent_json("requires_payment_method")),
        )
        .expect(1)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .payment_intent_create(&serde_json::json!({
            "amount": 10.0,
            "currency": "USD",
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
}

#[tokio::test]
async fn missing_secret_key_is_a_server_error() {
    let app = TestApp::spawn_with_secret_key("").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .payment_intent_create(&serde_json::json!({ "amount": 10.0 }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("STRIPE_SECRET_KEY is not set"));
}

#[tokio::test]
async fn non_positive_amounts_never_reach_the_processor() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.stripe_server)
        .await;

    for amount in [serde_json::json!(0), serde_json::json!(-5.0)] {
        let res = app
            .payment_intent_create(&serde_json::json!({ "amount": amount }))
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!("Amount must be a positive number", body["error"]);
    }
}

#[tokio::test]
async fn missing_amount_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let res = app
        .payment_intent_create(&serde_json::json!({ "currency": "usd" }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn unsucceeded_payment_is_not_confirmed() {
    let app = TestApp::spawn().await;
    app.mock_intent_retrieved("requires_payment_method").await;

    let registration = seed_pending_registration(&app).await;

    let res = app
        .payment_confirm(&serde_json::json!({
            "payment_intent_id": "pi_123",
            "registration_id": registration.id,
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Payment not completed", body["error"]);

    // no store update happened
    let record = app.store.record(registration.id).unwrap();
    assert_eq!(Some("pending".to_string()), record.payment_status);
    assert_eq!(None, record.payment_intent_id);
}

#[tokio::test]
async fn confirmation_fails_for_an_unknown_registration() {
    let app = TestApp::spawn().await;
    app.mock_intent_retrieved("succeeded").await;

    let res = app
        .payment_confirm(&serde_json::json!({
            "payment_intent_id": "pi_123",
            "registration_id": uuid::Uuid::new_v4(),
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("No registration found"));
}

#[tokio::test]
async fn preflight_requests_get_permissive_cors_headers() {
    let app = TestApp::spawn().await;

    for endpoint in ["create-payment-intent", "confirm-payment"] {
        let res = app
            .preflight(endpoint)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::OK, res.status());
        let headers = res.headers();
        assert_eq!("*", headers["Access-Control-Allow-Origin"].to_str().unwrap());
        assert_eq!(
            "POST, OPTIONS",
            headers["Access-Control-Allow-Methods"].to_str().unwrap()
        );
        assert!(headers["Access-Control-Allow-Headers"]
            .to_str()
            .unwrap()
            .contains("Content-Type"));
        assert_eq!("ok", res.text().await.unwrap());
    }
}

async fn seed_pending_registration(app: &TestApp) -> hackathon_server::model::Registration {
    use hackathon_server::flow::RegistrationStore;

    let draft = RegistrationDraft {
        name: "Grace Hopper".into(),
        email: "grace@example.com".into(),
        experience_level: "expert".into(),
        registration_type: "premium".into(),
        ..RegistrationDraft::default()
    };
    let new_registration = NewRegistration::try_from(draft).unwrap();

    app.store.insert(&new_registration).await.unwrap()
}
