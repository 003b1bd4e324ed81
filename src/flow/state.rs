use uuid::Uuid;

use crate::error::MissingFields;

/// UI phase of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Form is open for input
    Editing,
    /// A submission is in flight; further submits are no-ops
    Submitting,
    /// Record inserted, intent created, payment modal open
    AwaitingPayment,
    /// Free registration completed
    SuccessFree,
    /// Premium registration completed and payment confirmed
    SuccessPaid,
    /// A dismissible error is showing; entered data is retained
    Error,
}

/// Everything the form state machine records: the current phase, the last
/// error message, and references to the in-flight registration and payment
/// intent. The draft itself lives with the caller so that errors and
/// cancellations never lose entered data.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub phase: Phase,
    pub error: Option<String>,
    pub registration_id: Option<Uuid>,
    pub payment_intent_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            phase: Phase::Editing,
            error: None,
            registration_id: None,
            payment_intent_id: None,
            client_secret: None,
        }
    }
}

/// Inputs to the form state machine, fired by the submission flow and by
/// the hosting UI (payment completion and cancellation)
#[derive(Debug, Clone)]
pub enum FormEvent {
    Submit,
    ValidationFailed(MissingFields),
    SubmitFailed(String),
    RegisteredFree(Uuid),
    PaymentIntentCreated {
        registration_id: Uuid,
        payment_intent_id: String,
        client_secret: String,
    },
    /// The record already exists in the store when intent creation fails;
    /// it is not rolled back
    PaymentIntentFailed {
        registration_id: Uuid,
        message: String,
    },
    PaymentConfirmed,
    PaymentFailed(String),
    PaymentCancelled,
    DismissError,
    Reset,
}

/// Pure transition function. Events that make no sense in the current phase
/// leave the state untouched, which is what makes a second submit while one
/// is already in flight a no-op.
pub fn reduce(state: FormState, event: FormEvent) -> FormState {
    use FormEvent as E;
    use Phase as P;

    match (state.phase, event) {
        (P::Editing | P::Error, E::Submit) => FormState {
            phase: P::Submitting,
            error: None,
            ..state
        },
        (P::Submitting, E::ValidationFailed(missing)) => FormState {
            phase: P::Error,
            error: Some(missing.to_string()),
            ..state
        },
        (P::Submitting, E::SubmitFailed(message)) => FormState {
            phase: P::Error,
            error: Some(message),
            ..state
        },
        (P::Submitting, E::RegisteredFree(registration_id)) => FormState {
            phase: P::SuccessFree,
            error: None,
            registration_id: Some(registration_id),
            ..state
        },
        (
            P::Submitting,
            E::PaymentIntentCreated {
                registration_id,
                payment_intent_id,
                client_secret,
            },
        ) => FormState {
            phase: P::AwaitingPayment,
            error: None,
            registration_id: Some(registration_id),
            payment_intent_id: Some(payment_intent_id),
            client_secret: Some(client_secret),
        },
        (
            P::Submitting,
            E::PaymentIntentFailed {
                registration_id,
                message,
            },
        ) => FormState {
            phase: P::Error,
            error: Some(message),
            registration_id: Some(registration_id),
            ..state
        },
        (P::AwaitingPayment, E::PaymentConfirmed) => FormState {
            phase: P::SuccessPaid,
            error: None,
            client_secret: None,
            ..state
        },
        // Modal closes on failure; the record stays pending
        (P::AwaitingPayment, E::PaymentFailed(message)) => FormState {
            phase: P::Error,
            error: Some(message),
            client_secret: None,
            ..state
        },
        // User backed out; the record stays pending with no automatic retry
        (P::AwaitingPayment, E::PaymentCancelled) => FormState {
            phase: P::Editing,
            client_secret: None,
            ..state
        },
        (P::Error, E::DismissError) => FormState {
            phase: P::Editing,
            error: None,
            ..state
        },
        (P::SuccessFree | P::SuccessPaid, E::Reset) => FormState::default(),
        (_, _) => state,
    }
}
