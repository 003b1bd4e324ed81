use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::client::CreatePaymentIntent;
use crate::domain::RegistrationType;
use crate::error::{Error, Result};
use crate::model::{NewRegistration, Registration, RegistrationDraft};

use super::ports::{PaymentGateway, RegistrationStore};
use super::state::{reduce, FormEvent, FormState, Phase};

/// Fixed price of the premium tier, in major currency units
pub const PREMIUM_TIER_PRICE_USD: f64 = 10.0;
pub const PREMIUM_TIER_CURRENCY: &str = "usd";
pub const PREMIUM_TIER_DESCRIPTION: &str =
    "Premium Hackathon Registration - DataAnalyzer Pro 2025";

/// Convert an amount in major currency units to the minor units the
/// processor expects (e.g. 10.00 USD -> 1000 cents)
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Orchestrates a registration submission end to end: validate, insert,
/// branch on tier, create a payment intent, and confirm the payment once
/// the participant has completed the processor's hosted payment fields.
/// All side effects live here; phase bookkeeping is delegated to [`reduce`].
pub struct SubmissionFlow {
    store: Arc<dyn RegistrationStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl SubmissionFlow {
    pub fn new(store: Arc<dyn RegistrationStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }

    /// Submit a draft. Exactly one insert attempt is made per call; a call
    /// while a submission is already in flight does nothing. The resulting
    /// phase is left in `state`; the returned error carries the underlying
    /// failure for callers that need its classification.
    #[tracing::instrument(name = "Submit registration", skip(self, state, draft))]
    pub async fn submit(&self, state: &mut FormState, draft: &RegistrationDraft) -> Result<()> {
        // re-entrancy guard: a submission already in flight stays untouched
        if state.phase == Phase::Submitting {
            return Ok(());
        }

        *state = reduce(state.clone(), FormEvent::Submit);
        if state.phase != Phase::Submitting {
            // the reducer refused the submit (e.g. from a success phase)
            return Ok(());
        }

        let new_registration = match NewRegistration::try_from(draft.clone()) {
            Ok(new_registration) => new_registration,
            Err(e) => {
                let event = match &e {
                    Error::Validation(missing) => FormEvent::ValidationFailed(missing.clone()),
                    other => FormEvent::SubmitFailed(other.to_string()),
                };
                *state = reduce(state.clone(), event);
                return Err(e);
            }
        };

        let registration = match self.store.insert(&new_registration).await {
            Ok(registration) => registration,
            Err(e) => {
                *state = reduce(state.clone(), FormEvent::SubmitFailed(e.to_string()));
                return Err(e);
            }
        };
        tracing::info!("Inserted registration {}", registration.id);

        match new_registration.registration_type {
            RegistrationType::Free => {
                *state = reduce(state.clone(), FormEvent::RegisteredFree(registration.id));
                Ok(())
            }
            RegistrationType::Premium => self.request_payment_intent(state, &registration).await,
        }
    }

    async fn request_payment_intent(
        &self,
        state: &mut FormState,
        registration: &Registration,
    ) -> Result<()> {
        let request = premium_intent_request(registration);

        let outcome = self
            .gateway
            .create_intent(&request)
            .await
            .and_then(|intent| {
                let client_secret = intent.client_secret.clone().ok_or_else(|| {
                    Error::PaymentIntent("Payment processor returned no client secret".into())
                })?;
                Ok((intent, client_secret))
            });

        match outcome {
            Ok((intent, client_secret)) => {
                *state = reduce(
                    state.clone(),
                    FormEvent::PaymentIntentCreated {
                        registration_id: registration.id,
                        payment_intent_id: intent.id,
                        client_secret,
                    },
                );
                Ok(())
            }
            Err(e) => {
                // The record already exists with a pending payment status
                *state = reduce(
                    state.clone(),
                    FormEvent::PaymentIntentFailed {
                        registration_id: registration.id,
                        message: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Completion signal from the payment collection UI: verify the charge
    /// with the processor and mark the record completed
    #[tracing::instrument(name = "Complete payment", skip(self, state))]
    pub async fn complete_payment(&self, state: &mut FormState) -> Result<Registration> {
        let (registration_id, payment_intent_id) = match (
            state.registration_id,
            state.payment_intent_id.clone(),
        ) {
            (Some(registration_id), Some(payment_intent_id))
                if state.phase == Phase::AwaitingPayment =>
            {
                (registration_id, payment_intent_id)
            }
            _ => {
                return Err(Error::Parsing(
                    "No payment is awaiting confirmation".into(),
                ))
            }
        };

        let confirmed = confirm_payment(
            self.gateway.as_ref(),
            self.store.as_ref(),
            &payment_intent_id,
            registration_id,
        )
        .await;

        match confirmed {
            Ok(registration) => {
                *state = reduce(state.clone(), FormEvent::PaymentConfirmed);
                Ok(registration)
            }
            Err(e) => {
                *state = reduce(state.clone(), FormEvent::PaymentFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// The participant closed the payment modal; the pending record is left
    /// as-is and the form returns to editing
    pub fn cancel_payment(&self, state: &mut FormState) {
        *state = reduce(state.clone(), FormEvent::PaymentCancelled);
    }
}

/// Intent-creation request for a premium registration: fixed tier price and
/// the metadata the processor dashboard shows next to the charge
pub fn premium_intent_request(registration: &Registration) -> CreatePaymentIntent {
    let mut metadata = BTreeMap::new();
    metadata.insert("registration_id".to_string(), registration.id.to_string());
    metadata.insert("participant_name".to_string(), registration.name.clone());
    metadata.insert("participant_email".to_string(), registration.email.clone());

    CreatePaymentIntent {
        amount_minor_units: to_minor_units(PREMIUM_TIER_PRICE_USD),
        currency: PREMIUM_TIER_CURRENCY.to_string(),
        description: Some(PREMIUM_TIER_DESCRIPTION.to_string()),
        metadata,
    }
}

/// Verify a payment with the processor and, only if it actually succeeded,
/// mark the matching registration record as completed. Shared between the
/// submission flow and the confirmation endpoint.
pub async fn confirm_payment(
    gateway: &dyn PaymentGateway,
    store: &dyn RegistrationStore,
    payment_intent_id: &str,
    registration_id: Uuid,
) -> Result<Registration> {
    let intent = gateway.retrieve_intent(payment_intent_id).await?;

    if intent.status != "succeeded" {
        return Err(Error::PaymentNotCompleted {
            status: intent.status,
        });
    }

    store
        .complete_payment(registration_id, &intent.id, intent.customer.as_deref())
        .await
}
