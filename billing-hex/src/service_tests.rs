//! Application service unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use billing_types::{
        AcceptedCurrencies, AppError, CardCharge, CardCharger, Currency, Customer, CustomerId,
        CustomerRegistrationRequest, CustomerRepository, GatewayError, NewPayment, Payment,
        PaymentId, PaymentRepository, PaymentRequest, PhoneNumberValidator, RepoError,
    };

    use crate::{CustomerRegistrationService, PaymentService};

    // ─────────────────────────────────────────────────────────────────────────
    // Fakes
    // ─────────────────────────────────────────────────────────────────────────

    /// In-memory customer store that records every call.
    #[derive(Default)]
    pub struct FakeCustomers {
        customers: Mutex<HashMap<CustomerId, Customer>>,
        saved: Mutex<Vec<Customer>>,
        phone_lookups: Mutex<Vec<String>>,
        id_lookups: Mutex<Vec<CustomerId>>,
        /// Written just before `save` reports a conflict, as if another
        /// request won the race for the phone number.
        race_winner: Mutex<Option<Customer>>,
    }

    impl FakeCustomers {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_customer(customer: Customer) -> Self {
            let repo = Self::new();
            repo.customers
                .lock()
                .unwrap()
                .insert(customer.id, customer);
            repo
        }

        pub fn losing_race_to(winner: Customer) -> Self {
            let repo = Self::new();
            *repo.race_winner.lock().unwrap() = Some(winner);
            repo
        }

        pub fn saved(&self) -> Vec<Customer> {
            self.saved.lock().unwrap().clone()
        }

        pub fn phone_lookups(&self) -> usize {
            self.phone_lookups.lock().unwrap().len()
        }

        pub fn id_lookups(&self) -> Vec<CustomerId> {
            self.id_lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CustomerRepository for FakeCustomers {
        async fn find_by_phone_number(
            &self,
            phone_number: &str,
        ) -> Result<Option<Customer>, RepoError> {
            self.phone_lookups
                .lock()
                .unwrap()
                .push(phone_number.to_string());
            Ok(self
                .customers
                .lock()
                .unwrap()
                .values()
                .find(|c| c.phone_number == phone_number)
                .cloned())
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
            self.id_lookups.lock().unwrap().push(id);
            Ok(self.customers.lock().unwrap().get(&id).cloned())
        }

        async fn save(&self, customer: Customer) -> Result<(), RepoError> {
            if let Some(winner) = self.race_winner.lock().unwrap().take() {
                self.customers.lock().unwrap().insert(winner.id, winner);
                return Err(RepoError::Conflict("phone_number already exists".into()));
            }
            self.saved.lock().unwrap().push(customer.clone());
            self.customers
                .lock()
                .unwrap()
                .insert(customer.id, customer);
            Ok(())
        }
    }

    /// Phone validator with a fixed answer.
    pub struct StaticValidator(pub bool);

    impl PhoneNumberValidator for StaticValidator {
        fn is_valid(&self, _phone_number: &str) -> bool {
            self.0
        }
    }

    /// Payment store that records saves.
    #[derive(Default)]
    pub struct FakePayments {
        saved: Mutex<Vec<Payment>>,
    }

    impl FakePayments {
        pub fn saved(&self) -> Vec<Payment> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentRepository for FakePayments {
        async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError> {
            let mut saved = self.saved.lock().unwrap();
            let id = PaymentId::new(saved.len() as i64 + 1);
            let payment = Payment::from_new(id, payment, Utc::now());
            saved.push(payment.clone());
            Ok(payment)
        }

        async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn list_for_customer(
            &self,
            customer_id: CustomerId,
        ) -> Result<Vec<Payment>, RepoError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|p| p.customer_id == customer_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ChargeCall {
        pub source: String,
        pub amount: Decimal,
        pub currency: Currency,
        pub description: String,
    }

    #[derive(Clone, Copy)]
    pub enum ChargeOutcome {
        Debited(bool),
        ProviderDown,
    }

    /// Card charger with a scripted outcome.
    pub struct FakeCharger {
        outcome: ChargeOutcome,
        calls: Mutex<Vec<ChargeCall>>,
    }

    impl FakeCharger {
        pub fn new(outcome: ChargeOutcome) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<ChargeCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CardCharger for FakeCharger {
        async fn charge_card(
            &self,
            source: &str,
            amount: Decimal,
            currency: Currency,
            description: &str,
        ) -> Result<CardCharge, GatewayError> {
            self.calls.lock().unwrap().push(ChargeCall {
                source: source.to_string(),
                amount,
                currency,
                description: description.to_string(),
            });
            match self.outcome {
                ChargeOutcome::Debited(debited) => Ok(CardCharge::new(debited)),
                ChargeOutcome::ProviderDown => Err(GatewayError::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "provider unreachable",
                ))),
            }
        }
    }

    fn alex(phone: &str) -> Customer {
        Customer::new(Some(CustomerId::new()), "Alex".into(), phone.into()).unwrap()
    }

    fn registration(
        repo: &Arc<FakeCustomers>,
        phone_ok: bool,
    ) -> CustomerRegistrationService<Arc<FakeCustomers>, StaticValidator> {
        CustomerRegistrationService::new(repo.clone(), StaticValidator(phone_ok))
    }

    type Payments = PaymentService<Arc<FakeCustomers>, Arc<FakePayments>, Arc<FakeCharger>>;

    fn payments(
        customers: &Arc<FakeCustomers>,
        store: &Arc<FakePayments>,
        charger: &Arc<FakeCharger>,
    ) -> Payments {
        PaymentService::new(customers.clone(), store.clone(), charger.clone())
    }

    fn usd_request(amount: Decimal) -> PaymentRequest {
        PaymentRequest::new(amount, Currency::USD, "23123", "Description")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_register_saves_new_customer() {
        let repo = Arc::new(FakeCustomers::new());
        let service = registration(&repo, true);

        service
            .register(CustomerRegistrationRequest::new(None, "Alex", "000558"))
            .await
            .unwrap();

        let saved = repo.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Alex");
        assert_eq!(saved[0].phone_number, "000558");
        assert!(!saved[0].id.as_uuid().is_nil());
    }

    #[tokio::test]
    async fn test_register_keeps_supplied_id() {
        let repo = Arc::new(FakeCustomers::new());
        let service = registration(&repo, true);
        let id = CustomerId::new();

        service
            .register(CustomerRegistrationRequest::new(Some(id), "Alex", "000558"))
            .await
            .unwrap();

        assert_eq!(repo.saved()[0].id, id);
    }

    #[tokio::test]
    async fn test_register_invalid_phone_fails_without_write() {
        let repo = Arc::new(FakeCustomers::new());
        let service = registration(&repo, false);

        let result = service
            .register(CustomerRegistrationRequest::new(None, "Alex", "000558"))
            .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("phone number 000558 is not valid"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(repo.saved().is_empty());
        assert_eq!(repo.phone_lookups(), 0);
    }

    #[tokio::test]
    async fn test_register_same_customer_twice_is_a_no_op() {
        let existing = alex("000558");
        let repo = Arc::new(FakeCustomers::with_customer(existing.clone()));
        let service = registration(&repo, true);

        service
            .register(CustomerRegistrationRequest::new(
                Some(existing.id),
                "Alex",
                "000558",
            ))
            .await
            .unwrap();

        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_register_taken_phone_number_conflicts() {
        let repo = Arc::new(FakeCustomers::with_customer(alex("000558")));
        let service = registration(&repo, true);

        let result = service
            .register(CustomerRegistrationRequest::new(
                Some(CustomerId::new()),
                "John",
                "000558",
            ))
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert!(msg.contains("000558")),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_register_lost_race_to_same_customer_succeeds() {
        let repo = Arc::new(FakeCustomers::losing_race_to(alex("000558")));
        let service = registration(&repo, true);

        service
            .register(CustomerRegistrationRequest::new(None, "Alex", "000558"))
            .await
            .unwrap();

        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_register_lost_race_to_other_customer_conflicts() {
        let repo = Arc::new(FakeCustomers::losing_race_to(alex("000558")));
        let service = registration(&repo, true);

        let result = service
            .register(CustomerRegistrationRequest::new(None, "John", "000558"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg.contains("000558")));
    }

    #[tokio::test]
    async fn test_register_blank_name_fails() {
        let repo = Arc::new(FakeCustomers::new());
        let service = registration(&repo, true);

        let result = service
            .register(CustomerRegistrationRequest::new(None, " ", "000558"))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let repo = Arc::new(FakeCustomers::new());
        let service = registration(&repo, true);

        let result = service.get_customer(CustomerId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_charge_unknown_customer_never_calls_provider() {
        let customers = Arc::new(FakeCustomers::new());
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);
        let customer_id = CustomerId::new();

        let result = service
            .charge_card(customer_id, usd_request(dec!(10)))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(customers.id_lookups(), vec![customer_id]);
        assert!(charger.calls().is_empty());
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charge_unsupported_currency_fails() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let result = service
            .charge_card(
                customer.id,
                PaymentRequest::new(dec!(10), Currency::EUR, "23123", "Description"),
            )
            .await;

        match result {
            Err(AppError::Policy(msg)) => {
                assert!(msg.contains("currency EUR is not supported"))
            }
            other => panic!("expected policy error, got {:?}", other),
        }
        assert!(charger.calls().is_empty());
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charge_not_debited_is_declined() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(false)));
        let service = payments(&customers, &store, &charger);

        let result = service
            .charge_card(customer.id, usd_request(dec!(10)))
            .await;

        match result {
            Err(AppError::Declined(msg)) => {
                assert!(msg.contains(&format!("card not debited for customer {}", customer.id)))
            }
            other => panic!("expected decline, got {:?}", other),
        }
        assert_eq!(charger.calls().len(), 1);
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charge_success_records_payment_for_resolved_customer() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        // The body names someone else; the path customer wins.
        let req = usd_request(dec!(10)).for_customer(CustomerId::new());
        let payment = service.charge_card(customer.id, req).await.unwrap();

        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], payment);
        assert_eq!(payment.customer_id, customer.id);
        assert_eq!(payment.amount.amount(), dec!(10));
        assert_eq!(payment.amount.currency(), Currency::USD);
        assert_eq!(payment.source, "23123");
        assert_eq!(payment.description, "Description");
    }

    #[tokio::test]
    async fn test_charge_passes_request_to_provider() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        service
            .charge_card(
                customer.id,
                PaymentRequest::new(dec!(1000.00), Currency::GBP, "0x0x0x0", "Shoes"),
            )
            .await
            .unwrap();

        assert_eq!(
            charger.calls(),
            vec![ChargeCall {
                source: "0x0x0x0".into(),
                amount: dec!(1000.00),
                currency: Currency::GBP,
                description: "Shoes".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_charge_provider_failure_is_gateway_error() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::ProviderDown));
        let service = payments(&customers, &store, &charger);

        let result = service
            .charge_card(customer.id, usd_request(dec!(10)))
            .await;

        match result {
            Err(AppError::Gateway(e)) => {
                assert_eq!(e.to_string(), "cannot perform charge");
                assert_eq!(e.cause().to_string(), "provider unreachable");
            }
            other => panic!("expected gateway error, got {:?}", other),
        }
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charge_rejects_client_payment_id() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let mut req = usd_request(dec!(10));
        req.payment.id = Some(1);
        let result = service.charge_card(customer.id, req).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(charger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_charge_unknown_customer_with_payment_id_is_not_found() {
        let customers = Arc::new(FakeCustomers::new());
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let mut req = usd_request(dec!(10));
        req.payment.id = Some(1);
        let result = service.charge_card(CustomerId::new(), req).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(charger.calls().is_empty());
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charge_rejects_sub_cent_amount_before_provider() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let result = service
            .charge_card(customer.id, usd_request(dec!(10.001)))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(charger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_charge_with_custom_currency_policy() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger)
            .with_accepted_currencies(AcceptedCurrencies::new([Currency::EUR]));

        let eur = service
            .charge_card(
                customer.id,
                PaymentRequest::new(dec!(5), Currency::EUR, "tok", "Coffee"),
            )
            .await;
        let usd = service
            .charge_card(customer.id, usd_request(dec!(5)))
            .await;

        assert!(eur.is_ok());
        assert!(matches!(usd, Err(AppError::Policy(msg)) if msg.contains("USD")));
    }

    #[tokio::test]
    async fn test_list_payments_for_unknown_customer() {
        let customers = Arc::new(FakeCustomers::new());
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let result = service.list_payments(CustomerId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_payment_after_charge() {
        let customer = alex("1111");
        let customers = Arc::new(FakeCustomers::with_customer(customer.clone()));
        let store = Arc::new(FakePayments::default());
        let charger = Arc::new(FakeCharger::new(ChargeOutcome::Debited(true)));
        let service = payments(&customers, &store, &charger);

        let payment = service
            .charge_card(customer.id, usd_request(dec!(25.50)))
            .await
            .unwrap();

        let fetched = service.get_payment(payment.id).await.unwrap();
        assert_eq!(fetched, payment);
        assert_eq!(
            service.list_payments(customer.id).await.unwrap(),
            vec![payment]
        );
    }
}
