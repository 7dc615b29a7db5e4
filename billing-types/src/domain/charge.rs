//! Outcome of a card charge attempt.

use serde::{Deserialize, Serialize};

/// Result of asking the card provider to charge an instrument.
///
/// Only consulted to decide whether a payment is recorded; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCharge {
    card_debited: bool,
}

impl CardCharge {
    pub fn new(card_debited: bool) -> Self {
        Self { card_debited }
    }

    pub fn debited() -> Self {
        Self::new(true)
    }

    pub fn not_debited() -> Self {
        Self::new(false)
    }

    /// Whether funds were actually moved.
    pub fn is_card_debited(&self) -> bool {
        self.card_debited
    }
}
