//! OpenAPI document for the billing routes.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use billing_types::domain::{Currency, CustomerId};
use billing_types::dto::{
    CustomerDetails, CustomerRegistrationRequest, CustomerResponse, PaymentDetails,
    PaymentRequest, PaymentResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Register a customer
///
/// Repeating a registration with the same name and phone number succeeds
/// without creating a second customer.
#[utoipa::path(
    post,
    path = "/api/v1/customer-registration",
    tag = "customers",
    request_body = CustomerRegistrationRequest,
    responses(
        (status = 200, description = "Customer registered (or already registered)"),
        (status = 400, description = "Invalid phone number or blank field"),
        (status = 409, description = "Phone number already taken by another customer")
    )
)]
async fn register_customer() {}

/// Get customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(
        ("id" = CustomerId, Path, description = "Customer ID (UUID)")
    ),
    responses(
        (status = 200, description = "Customer details", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
async fn get_customer() {}

/// Charge a customer's card
#[utoipa::path(
    post,
    path = "/api/v1/customers/{id}/payments",
    tag = "payments",
    request_body = PaymentRequest,
    params(
        ("id" = CustomerId, Path, description = "Customer ID (UUID)")
    ),
    responses(
        (status = 201, description = "Card debited and payment recorded", body = PaymentResponse),
        (status = 400, description = "Invalid request"),
        (status = 402, description = "Card was not debited"),
        (status = 404, description = "Customer not found"),
        (status = 422, description = "Currency not supported"),
        (status = 502, description = "Card provider failure")
    )
)]
async fn charge_customer() {}

/// Charge a card for the customer named in the body
#[utoipa::path(
    post,
    path = "/api/v1/payment",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Card debited and payment recorded", body = PaymentResponse),
        (status = 400, description = "Invalid request or missing customer_id"),
        (status = 402, description = "Card was not debited"),
        (status = 404, description = "Customer not found"),
        (status = 422, description = "Currency not supported"),
        (status = 502, description = "Card provider failure")
    )
)]
async fn make_payment() {}

/// Get payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment details", body = PaymentResponse),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment() {}

/// List payments for a customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/payments",
    tag = "payments",
    params(
        ("id" = CustomerId, Path, description = "Customer ID (UUID)")
    ),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<PaymentResponse>),
        (status = 404, description = "Customer not found")
    )
)]
async fn list_customer_payments() {}

/// OpenAPI documentation for the Billing API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Billing API",
        version = "1.0.0",
        description = "Customer registration keyed by phone number, and card payments in accepted currencies.",
        license(name = "MIT"),
    ),
    paths(
        health,
        register_customer,
        get_customer,
        charge_customer,
        make_payment,
        get_payment,
        list_customer_payments,
    ),
    components(
        schemas(
            CustomerDetails,
            CustomerRegistrationRequest,
            CustomerResponse,
            PaymentDetails,
            PaymentRequest,
            PaymentResponse,
            Currency,
            CustomerId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "customers", description = "Customer registration"),
        (name = "payments", description = "Card payments"),
    )
)]
pub struct ApiDoc;
