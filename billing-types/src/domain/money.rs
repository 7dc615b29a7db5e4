//! Monetary values and the currencies the billing service knows about.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Currencies representable at the API boundary.
///
/// Being representable does not mean a currency can be charged;
/// see [`AcceptedCurrencies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    GBP,
    EUR,
}

impl Currency {
    /// Returns the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::USD | Currency::GBP | Currency::EUR => 2,
        }
    }

    /// Returns the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::EUR => "€",
        }
    }

    /// Lowercase ISO code, as card providers expect it.
    pub fn code_lowercase(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::EUR => "eur",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            "EUR" => Ok(Currency::EUR),
            other => Err(DomainError::ValidationError(format!(
                "unknown currency {}",
                other
            ))),
        }
    }
}

/// The subset of currencies the charging workflow accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedCurrencies(Vec<Currency>);

impl AcceptedCurrencies {
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        let mut accepted: Vec<Currency> = Vec::new();
        for c in currencies {
            if !accepted.contains(&c) {
                accepted.push(c);
            }
        }
        Self(accepted)
    }

    pub fn accepts(&self, currency: Currency) -> bool {
        self.0.contains(&currency)
    }
}

impl Default for AcceptedCurrencies {
    fn default() -> Self {
        Self::new([Currency::USD, Currency::GBP])
    }
}

/// A non-negative amount in a given currency.
///
/// The amount is a decimal in major units (`10.50` dollars), never a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value.
    ///
    /// # Validation
    /// - Amount cannot be negative
    /// - Amount cannot carry more fractional digits than the currency has
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeAmount);
        }

        let places = currency.decimal_places();
        if amount.normalize().scale() > places {
            return Err(DomainError::InvalidPrecision {
                amount: amount.to_string(),
                currency,
                places,
            });
        }

        Ok(Self { amount, currency })
    }

    /// Returns the amount in major units.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount in the smallest currency unit (cents, pence).
    pub fn minor_units(&self) -> Result<i64, DomainError> {
        let factor = Decimal::from(10i64.pow(self.currency.decimal_places()));
        self.amount
            .checked_mul(factor)
            .and_then(|units| units.trunc().to_i64())
            .ok_or_else(|| DomainError::ValidationError("Amount is too large".into()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.currency.decimal_places();
        let mut rounded = self.amount;
        rounded.rescale(places);
        write!(f, "{}{}", self.currency.symbol(), rounded)
    }
}
