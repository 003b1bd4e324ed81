use sqlx::PgPool;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::flow::RegistrationStore;
use crate::model::{NewRegistration, Registration};

/// Postgres registration store
#[derive(Debug, Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RegistrationStore for PgRegistrationStore {
    #[tracing::instrument(name = "Insert registration", skip(self, new_registration))]
    async fn insert(&self, new_registration: &NewRegistration) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            insert into hackathon_registrations
                (name, email, phone, experience_level, motivation,
                 tracks_interested, registration_type, payment_status)
            values ($1, $2, $3, $4, $5, $6, $7, $8)
            returning *
            "#,
        )
        .bind(new_registration.name.as_ref())
        .bind(new_registration.email.as_ref())
        .bind(new_registration.phone.as_deref())
        .bind(new_registration.experience_level.as_ref())
        .bind(new_registration.motivation.as_deref())
        .bind(&new_registration.tracks_interested)
        .bind(new_registration.registration_type.as_ref())
        .bind(
            new_registration
                .initial_payment_status()
                .map(|status| status.as_ref().to_string()),
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    #[tracing::instrument(name = "Complete registration payment", skip(self))]
    async fn complete_payment(
        &self,
        id: Uuid,
        payment_intent_id: &str,
        stripe_customer_id: Option<&str>,
    ) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            update hackathon_registrations
            set payment_status = 'completed',
                payment_intent_id = $2,
                stripe_customer_id = $3,
                updated_at = now()
            where id = $1
            returning *
            "#,
        )
        .bind(id)
        .bind(payment_intent_id)
        .bind(stripe_customer_id)
        .fetch_optional(&self.pool)
        .await?;

        registration.ok_or(Error::RegistrationNotFound(id))
    }
}
