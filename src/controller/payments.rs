use std::collections::BTreeMap;

use actix_web::{post, route, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::client::CreatePaymentIntent;
use crate::error::{Error, RestError, RestResult};
use crate::flow::{self, to_minor_units, PaymentGateway, RegistrationStore};
use crate::model::Registration;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in major currency units, e.g. 10.0 for $10
    amount: f64,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentResponse {
    client_secret: String,
    payment_intent_id: String,
}

/// Create a payment intent with the processor and hand its client secret
/// back to the payment collection UI
#[tracing::instrument(name = "Create a payment intent", skip(gateway, body))]
#[post("/create-payment-intent")]
pub async fn create_payment_intent(
    gateway: web::Data<dyn PaymentGateway>,
    body: web::Json<CreatePaymentIntentRequest>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();

    // Reject bad amounts before the processor is ever contacted
    if !body.amount.is_finite() || body.amount <= 0.0 {
        return Err(RestError::BadRequest(
            "Amount must be a positive number".into(),
        ));
    }

    let request = CreatePaymentIntent {
        amount_minor_units: to_minor_units(body.amount),
        // the processor only accepts lowercase ISO currency codes
        currency: body.currency.to_lowercase(),
        description: body.description,
        metadata: body.metadata,
    };

    let intent = gateway.create_intent(&request).await.map_err(RestError::from)?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        RestError::BadRequest("Payment processor returned no client secret".into())
    })?;

    Ok(HttpResponse::Ok().json(CreatePaymentIntentResponse {
        client_secret,
        payment_intent_id: intent.id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    payment_intent_id: String,
    registration_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    success: bool,
    registration: Registration,
}

/// Verify a payment with the processor and mark the matching registration
/// record completed. Any failure here, including a store failure after
/// money has moved, is reported to the caller as a client error so the UI
/// can show its "contact support" message.
#[tracing::instrument(name = "Confirm a payment", skip(gateway, store))]
#[post("/confirm-payment")]
pub async fn confirm_payment(
    gateway: web::Data<dyn PaymentGateway>,
    store: web::Data<dyn RegistrationStore>,
    body: web::Json<ConfirmPaymentRequest>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();

    let registration = flow::confirm_payment(
        gateway.get_ref(),
        store.get_ref(),
        &body.payment_intent_id,
        body.registration_id,
    )
    .await
    .map_err(|e| match e {
        Error::Configuration(_) => RestError::from(e),
        e => RestError::bad_request(e),
    })?;

    Ok(HttpResponse::Ok().json(ConfirmPaymentResponse {
        success: true,
        registration,
    }))
}

/// CORS pre-flights; the permissive headers themselves are applied
/// app-wide by the default-headers middleware
#[route("/create-payment-intent", method = "OPTIONS")]
pub async fn create_payment_intent_preflight() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[route("/confirm-payment", method = "OPTIONS")]
pub async fn confirm_payment_preflight() -> impl Responder {
    HttpResponse::Ok().body("ok")
}
