use async_trait::async_trait;
use rust_decimal::Decimal;

use billing_types::{CardCharge, CardCharger, Currency, GatewayError};

/// Charger for local runs: every charge gets the configured outcome.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedCardCharger {
    debit: bool,
}

impl SimulatedCardCharger {
    pub fn new(debit: bool) -> Self {
        Self { debit }
    }

    /// A charger that debits every card.
    pub fn always_debit() -> Self {
        Self::new(true)
    }

    /// A charger that declines every card.
    pub fn never_debit() -> Self {
        Self::new(false)
    }
}

impl Default for SimulatedCardCharger {
    fn default() -> Self {
        Self::always_debit()
    }
}

#[async_trait]
impl CardCharger for SimulatedCardCharger {
    async fn charge_card(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        _description: &str,
    ) -> Result<CardCharge, GatewayError> {
        tracing::debug!(source, %amount, %currency, debited = self.debit, "simulated card charge");
        Ok(CardCharge::new(self.debit))
    }
}
