use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use secrecy::{ExposeSecret, Secret};

use serde::Deserialize;

use url::Url;

use crate::error::{Error, Result};
use crate::flow::PaymentGateway;

/// Intent-creation request, in the processor's own units
#[derive(Debug, Clone)]
pub struct CreatePaymentIntent {
    pub amount_minor_units: i64,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// A payment intent as returned by the processor. Ephemeral; only the id and
/// customer reference ever make it into a registration record.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// REST client for the Stripe payment-intents API
#[derive(Debug)]
pub struct StripeClient {
    client: Client,

    payment_intents_url: Url,
    secret_key: Secret<String>,
}

impl StripeClient {
    pub fn new(
        api_base_url: Url,
        api_timeout: Duration,
        secret_key: Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let payment_intents_url = api_base_url
            .join("v1/payment_intents")
            .context("Failed to create payment intents endpoint URL")?;

        Ok(Self {
            client,
            payment_intents_url,
            secret_key,
        })
    }

    /// The key is read lazily so that a server booted without one still
    /// serves everything except the payment endpoints, which report the
    /// missing configuration per request.
    fn secret_key(&self) -> Result<&str> {
        let key = self.secret_key.expose_secret();
        if key.trim().is_empty() {
            return Err(Error::Configuration("STRIPE_SECRET_KEY is not set".into()));
        }
        Ok(key)
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StripeClient {
    #[tracing::instrument(name = "Create payment intent", skip(self, request))]
    async fn create_intent(&self, request: &CreatePaymentIntent) -> Result<PaymentIntent> {
        let key = self.secret_key()?;

        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), request.amount_minor_units.to_string()),
            ("currency".into(), request.currency.clone()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        if let Some(description) = &request.description {
            form.push(("description".into(), description.clone()));
        }
        for (name, value) in &request.metadata {
            form.push((format!("metadata[{}]", name), value.clone()));
        }

        let response = self
            .client
            .post(self.payment_intents_url.clone())
            .bearer_auth(key)
            .form(&form)
            .send()
            .await?;

        into_intent(response).await
    }

    #[tracing::instrument(name = "Retrieve payment intent", skip(self))]
    async fn retrieve_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent> {
        let key = self.secret_key()?;

        let mut url = self.payment_intents_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Configuration("Invalid payment API base URL".into()))?
            .push(payment_intent_id);

        let response = self.client.get(url).bearer_auth(key).send().await?;

        into_intent(response).await
    }
}

async fn into_intent(response: reqwest::Response) -> Result<PaymentIntent> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<PaymentIntent>().await?);
    }

    // Stripe rejections carry {"error": {"message": ...}}
    let body = response
        .json::<StripeErrorBody>()
        .await
        .unwrap_or_default();
    let message = body
        .error
        .message
        .unwrap_or_else(|| format!("Payment processor returned {}", status));

    Err(Error::PaymentIntent(message))
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    error: StripeErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}
