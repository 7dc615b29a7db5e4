//! # Billing Client SDK
//!
//! A typed Rust client for the Billing API.

use billing_types::{
    Currency, CustomerId, CustomerRegistrationRequest, CustomerResponse, PaymentRequest,
    PaymentResponse,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Billing API client.
pub struct BillingClient {
    base_url: String,
    http: Client,
}

impl BillingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a customer. Repeating the same registration also succeeds.
    pub async fn register_customer(
        &self,
        id: Option<CustomerId>,
        name: &str,
        phone_number: &str,
    ) -> Result<(), ClientError> {
        let req = CustomerRegistrationRequest::new(id, name, phone_number);
        let resp = self
            .http
            .post(format!("{}/api/v1/customer-registration", self.base_url))
            .json(&req)
            .send()
            .await?;
        Self::check_status(resp).await.map(|_| ())
    }

    /// Gets a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<CustomerResponse, ClientError> {
        self.get(&format!("/api/v1/customers/{}", id)).await
    }

    /// Charges a customer's card and records the payment.
    pub async fn charge(
        &self,
        customer_id: CustomerId,
        amount: Decimal,
        currency: Currency,
        source: &str,
        description: &str,
    ) -> Result<PaymentResponse, ClientError> {
        let req = PaymentRequest::new(amount, currency, source, description);
        self.post(&format!("/api/v1/customers/{}/payments", customer_id), &req)
            .await
    }

    /// Charges a card for the customer named in the request body.
    pub async fn make_payment(
        &self,
        customer_id: CustomerId,
        amount: Decimal,
        currency: Currency,
        source: &str,
        description: &str,
    ) -> Result<PaymentResponse, ClientError> {
        let req =
            PaymentRequest::new(amount, currency, source, description).for_customer(customer_id);
        self.post("/api/v1/payment", &req).await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: i64) -> Result<PaymentResponse, ClientError> {
        self.get(&format!("/api/v1/payments/{}", id)).await
    }

    /// Lists a customer's payments, newest first.
    pub async fn list_payments(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<PaymentResponse>, ClientError> {
        self.get(&format!("/api/v1/customers/{}/payments", customer_id))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pulls `error` out of an API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
