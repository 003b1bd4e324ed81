use reqwest::StatusCode;

use uuid::Uuid;

use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{free_draft, premium_draft, TestApp};

#[tokio::test]
async fn free_registration_completes_without_touching_the_processor() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .registration_create(&free_draft())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    let id: Uuid = body["registration_id"].as_str().unwrap().parse().unwrap();
    assert!(body.get("client_secret").is_none());

    let record = app.store.record(id).expect("Record was not persisted");
    assert_eq!(None, record.payment_status);
    assert_eq!("free", record.registration_type);
}

#[tokio::test]
async fn registration_normalizes_participant_input() {
    let app = TestApp::spawn().await;

    let mut draft = free_draft();
    draft["name"] = serde_json::json!("  Grace Hopper ");
    draft["email"] = serde_json::json!("  GRACE@Example.COM ");
    draft["phone"] = serde_json::json!("   ");

    let res = app
        .registration_create(&draft)
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let record = &app.store.records()[0];
    assert_eq!("Grace Hopper", record.name);
    assert_eq!("grace@example.com", record.email);
    assert_eq!(None, record.phone);
}

#[tokio::test]
async fn missing_required_fields_are_rejected_before_any_insert() {
    let app = TestApp::spawn().await;

    let mut draft = free_draft();
    draft["email"] = serde_json::json!("");
    draft.as_object_mut().unwrap().remove("name");

    let res = app
        .registration_create(&draft)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        "Please fill in all required fields: name, email",
        body["error"]
    );

    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn premium_registration_returns_the_client_secret() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(body_string_contains("amount=1000"))
        .and(body_string_contains("currency=usd"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(crate::helpers::intent_json("requires_payment_method")),
        )
        .expect(1)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .registration_create(&premium_draft())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("pi_123", body["payment_intent_id"]);
    assert_eq!("pi_123_secret_abc", body["client_secret"]);

    let id: Uuid = body["registration_id"].as_str().unwrap().parse().unwrap();
    let record = app.store.record(id).unwrap();
    assert_eq!(Some("pending".to_string()), record.payment_status);
}

#[tokio::test]
async fn premium_happy_path_completes_after_confirmation() {
    let app = TestApp::spawn().await;
    app.mock_intent_created().await;
    app.mock_intent_retrieved("succeeded").await;

    let res = app
        .registration_create(&premium_draft())
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = res.json().await.unwrap();
    let registration_id = body["registration_id"].clone();

    let res = app
        .payment_confirm(&serde_json::json!({
            "payment_intent_id": body["payment_intent_id"],
            "registration_id": registration_id,
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(true, body["success"]);
    assert_eq!("completed", body["registration"]["payment_status"]);
    assert_eq!("cus_42", body["registration"]["stripe_customer_id"]);

    let id: Uuid = registration_id.as_str().unwrap().parse().unwrap();
    let record = app.store.record(id).unwrap();
    assert_eq!(Some("completed".to_string()), record.payment_status);
    assert_eq!(Some("pi_123".to_string()), record.payment_intent_id);
}

#[tokio::test]
async fn intent_failure_still_leaves_a_pending_record() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
            "error": { "type": "card_error", "message": "Your card was declined." }
        })))
        .expect(1)
        .mount(&app.stripe_server)
        .await;

    let res = app
        .registration_create(&premium_draft())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Your card was declined.", body["error"]);

    // the record was inserted before the intent request and is not rolled back
    let records = app.store.records();
    assert_eq!(1, records.len());
    assert_eq!(Some("pending".to_string()), records[0].payment_status);
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let app = TestApp::spawn().await;

    let mut draft = free_draft();
    draft["email"] = serde_json::json!("");

    let res = app
        .registration_create(&draft)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!(
        "*",
        res.headers()["Access-Control-Allow-Origin"].to_str().unwrap()
    );
}
