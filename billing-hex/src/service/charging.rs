//! Card payment workflow.

use billing_types::{
    AcceptedCurrencies, AppError, CardCharger, CustomerId, CustomerRepository, Money, NewPayment,
    Payment, PaymentId, PaymentRepository, PaymentRequest,
};

/// Application service for charging customers' cards.
///
/// A charge passes four gates in order, each one short-circuiting the rest:
/// the customer exists, the currency is accepted, the provider debits the
/// card, and only then is a payment recorded.
pub struct PaymentService<C, P, G>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardCharger,
{
    customers: C,
    payments: P,
    charger: G,
    accepted_currencies: AcceptedCurrencies,
}

impl<C, P, G> PaymentService<C, P, G>
where
    C: CustomerRepository,
    P: PaymentRepository,
    G: CardCharger,
{
    /// Creates a payment service accepting the default currencies.
    pub fn new(customers: C, payments: P, charger: G) -> Self {
        Self {
            customers,
            payments,
            charger,
            accepted_currencies: AcceptedCurrencies::default(),
        }
    }

    /// Replaces the accepted currency policy.
    pub fn with_accepted_currencies(mut self, accepted: AcceptedCurrencies) -> Self {
        self.accepted_currencies = accepted;
        self
    }

    /// Charges a customer's card and records the payment.
    ///
    /// The customer id argument is authoritative: whatever customer the
    /// request body names is overwritten.
    #[tracing::instrument(
        skip(self, req),
        fields(customer_id = %customer_id, currency = %req.payment.currency)
    )]
    pub async fn charge_card(
        &self,
        customer_id: CustomerId,
        req: PaymentRequest,
    ) -> Result<Payment, AppError> {
        let details = req.payment;

        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {}", customer_id)))?;

        if details.id.is_some() {
            return Err(AppError::Validation(
                "payment id is assigned by the server".into(),
            ));
        }

        if !self.accepted_currencies.accepts(details.currency) {
            tracing::warn!("rejected charge in unsupported currency");
            return Err(AppError::Policy(format!(
                "currency {} is not supported",
                details.currency
            )));
        }

        let amount = Money::new(details.amount, details.currency)?;

        let charge = self
            .charger
            .charge_card(
                &details.source,
                amount.amount(),
                amount.currency(),
                &details.description,
            )
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "card provider call failed"))?;

        if !charge.is_card_debited() {
            tracing::warn!("card provider did not debit the card");
            return Err(AppError::Declined(format!(
                "card not debited for customer {}",
                customer_id
            )));
        }

        let payment = self
            .payments
            .save(NewPayment::new(
                customer.id,
                amount,
                details.source,
                details.description,
            ))
            .await?;

        tracing::info!(payment_id = %payment.id, amount = %payment.amount, "card charged");
        Ok(payment)
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.payments
            .find_by_id(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("payment {}", id))))
    }

    /// Lists payments for a customer.
    pub async fn list_payments(&self, customer_id: CustomerId) -> Result<Vec<Payment>, AppError> {
        // Verify customer exists first
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(AppError::NotFound(format!("customer {}", customer_id)));
        }

        self.payments
            .list_for_customer(customer_id)
            .await
            .map_err(Into::into)
    }
}
