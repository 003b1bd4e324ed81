use uuid::Uuid;

use crate::client::{CreatePaymentIntent, PaymentIntent};
use crate::error::Result;
use crate::model::{NewRegistration, Registration};

/// Persistence store for registration records.
/// Implemented for Postgres; trait-shaped to facilitate testing/mocking.
/// NOTE: async-trait is needed here because the submission flow and the
/// HTTP handlers hold these as trait objects.
#[async_trait::async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert a new registration record, returning it with its assigned id
    async fn insert(&self, new_registration: &NewRegistration) -> Result<Registration>;

    /// Mark a registration's payment as completed, recording the processor
    /// back-references. Scoped by record id; affects at most one record.
    async fn complete_payment(
        &self,
        id: Uuid,
        payment_intent_id: &str,
        stripe_customer_id: Option<&str>,
    ) -> Result<Registration>;
}

/// Card payment processor
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent and return it with its client secret
    async fn create_intent(&self, request: &CreatePaymentIntent) -> Result<PaymentIntent>;

    /// Look up an existing payment intent by id
    async fn retrieve_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent>;
}
