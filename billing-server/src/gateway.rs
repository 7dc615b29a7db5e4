//! Card charger selection.

use async_trait::async_trait;
use rust_decimal::Decimal;

use billing_types::{CardCharge, CardCharger, Currency, GatewayError};
use card_gateway::{HttpChargeApi, SimulatedCardCharger, StripeCardCharger};

use crate::config::GatewayConfig;

/// The charger picked at startup.
pub enum Charger {
    Simulated(SimulatedCardCharger),
    Stripe(StripeCardCharger<HttpChargeApi>),
}

impl Charger {
    pub fn from_config(config: &GatewayConfig) -> Self {
        match config {
            GatewayConfig::Simulated { debit } => {
                tracing::warn!(debit, "using simulated card charger");
                Self::Simulated(SimulatedCardCharger::new(*debit))
            }
            GatewayConfig::Stripe { api_key, api_base } => {
                tracing::info!(api_base = %api_base, "using Stripe card charger");
                Self::Stripe(StripeCardCharger::new(
                    HttpChargeApi::new(api_base.as_str()),
                    api_key.as_str(),
                ))
            }
        }
    }
}

#[async_trait]
impl CardCharger for Charger {
    async fn charge_card(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: &str,
    ) -> Result<CardCharge, GatewayError> {
        match self {
            Self::Simulated(c) => c.charge_card(source, amount, currency, description).await,
            Self::Stripe(c) => c.charge_card(source, amount, currency, description).await,
        }
    }
}
