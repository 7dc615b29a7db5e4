//! Card charging port.
//!
//! Implementations talk to a card provider (or simulate one).

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{CardCharge, Currency};
use crate::error::GatewayError;

/// Port trait for the external card-charging capability.
///
/// An implementation MUST translate every provider failure into
/// [`GatewayError`]; a successful call that moved no funds is
/// `Ok(CardCharge::not_debited())`, not an error.
#[async_trait::async_trait]
pub trait CardCharger: Send + Sync + 'static {
    async fn charge_card(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: &str,
    ) -> Result<CardCharge, GatewayError>;
}

#[async_trait::async_trait]
impl<T: CardCharger + ?Sized> CardCharger for Arc<T> {
    async fn charge_card(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: &str,
    ) -> Result<CardCharge, GatewayError> {
        (**self)
            .charge_card(source, amount, currency, description)
            .await
    }
}
