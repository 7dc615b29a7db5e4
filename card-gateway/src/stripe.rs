//! Stripe-style card charging.
//!
//! [`StripeCardCharger`] owns the translation between the billing domain and
//! the provider: it builds the charge parameters, reads the provider's `paid`
//! flag, and folds every provider failure into [`GatewayError`]. The wire
//! call itself sits behind [`ChargeApi`] so it can be swapped in tests.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use billing_types::{CardCharge, CardCharger, Currency, GatewayError, Money};

// ─────────────────────────────────────────────────────────────────────────────
// Provider API seam
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters of a provider charge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeParams {
    pub source: String,
    pub description: String,
    /// Amount in the currency's minor unit (cents, pence)
    pub amount: i64,
    /// Lowercase ISO code, e.g. `usd`
    pub currency: String,
}

/// Per-request provider options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub api_key: String,
}

/// The provider's view of a created charge.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCharge {
    #[serde(default)]
    pub id: Option<String>,
    pub paid: bool,
}

/// Failure talking to the provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Creates charges at a card provider.
#[async_trait]
pub trait ChargeApi: Send + Sync + 'static {
    async fn create(
        &self,
        params: ChargeParams,
        options: RequestOptions,
    ) -> Result<ProviderCharge, ProviderError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Charger
// ─────────────────────────────────────────────────────────────────────────────

/// [`CardCharger`] backed by a Stripe-compatible provider.
pub struct StripeCardCharger<A: ChargeApi> {
    api: A,
    api_key: String,
}

impl<A: ChargeApi> StripeCardCharger<A> {
    pub fn new(api: A, api_key: impl Into<String>) -> Self {
        Self {
            api,
            api_key: api_key.into(),
        }
    }

    fn params(
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: &str,
    ) -> Result<ChargeParams, GatewayError> {
        let minor_units = Money::new(amount, currency)
            .and_then(|money| money.minor_units())
            .map_err(GatewayError::new)?;

        Ok(ChargeParams {
            source: source.to_string(),
            description: description.to_string(),
            amount: minor_units,
            currency: currency.code_lowercase().to_string(),
        })
    }
}

#[async_trait]
impl<A: ChargeApi> CardCharger for StripeCardCharger<A> {
    async fn charge_card(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: &str,
    ) -> Result<CardCharge, GatewayError> {
        let params = Self::params(source, amount, currency, description)?;
        let options = RequestOptions {
            api_key: self.api_key.clone(),
        };

        match self.api.create(params, options).await {
            Ok(charge) => {
                tracing::debug!(charge_id = ?charge.id, paid = charge.paid, "provider charge created");
                Ok(CardCharge::new(charge.paid))
            }
            Err(e) => {
                tracing::error!(error = %e, "provider charge failed");
                Err(GatewayError::new(e))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP provider API
// ─────────────────────────────────────────────────────────────────────────────

/// reqwest-backed [`ChargeApi`] posting to `{base_url}/v1/charges`.
pub struct HttpChargeApi {
    base_url: String,
    http: Client,
}

impl HttpChargeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ChargeApi for HttpChargeApi {
    async fn create(
        &self,
        params: ChargeParams,
        options: RequestOptions,
    ) -> Result<ProviderCharge, ProviderError> {
        let resp = self
            .http
            .post(format!("{}/v1/charges", self.base_url))
            .bearer_auth(&options.api_key)
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp.json::<ProviderCharge>().await?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or(body);
            Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
