use actix_web::{post, route, web, HttpResponse, Responder};

use serde::Serialize;

use uuid::Uuid;

use crate::error::{RestError, RestResult};
use crate::flow::{FormState, PaymentGateway, Phase, RegistrationStore, SubmissionFlow};
use crate::model::RegistrationDraft;

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    registration_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
}

/// Run the submission flow for a registration draft. Free registrations
/// complete immediately; premium ones come back with the client secret the
/// payment collection UI needs to take the card payment.
#[tracing::instrument(name = "Create a registration", skip(store, gateway, draft))]
#[post("/registrations")]
pub async fn create(
    store: web::Data<dyn RegistrationStore>,
    gateway: web::Data<dyn PaymentGateway>,
    draft: web::Json<RegistrationDraft>,
) -> RestResult<HttpResponse> {
    let flow = SubmissionFlow::new(store.into_inner(), gateway.into_inner());
    let draft = draft.into_inner();

    let mut state = FormState::default();
    flow.submit(&mut state, &draft).await?;

    let registration_id = state.registration_id.ok_or_else(|| {
        RestError::Internal("Submission finished without a record id".into())
    })?;

    match state.phase {
        Phase::SuccessFree => Ok(HttpResponse::Created().json(RegistrationResponse {
            registration_id,
            payment_intent_id: None,
            client_secret: None,
        })),
        Phase::AwaitingPayment => Ok(HttpResponse::Ok().json(RegistrationResponse {
            registration_id,
            payment_intent_id: state.payment_intent_id,
            client_secret: state.client_secret,
        })),
        phase => Err(RestError::Internal(format!(
            "Submission finished in unexpected phase {:?}",
            phase
        ))),
    }
}

#[route("/registrations", method = "OPTIONS")]
pub async fn preflight() -> impl Responder {
    HttpResponse::Ok().body("ok")
}
