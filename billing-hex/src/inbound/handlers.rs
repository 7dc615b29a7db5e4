//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use billing_types::{
    AppError, BillingRepository, CardCharger, CustomerId, CustomerRegistrationRequest,
    CustomerResponse, PaymentId, PaymentRequest, PaymentResponse, PhoneNumberRules,
};

use crate::{CustomerRegistrationService, PaymentService};

/// Application state shared across handlers.
pub struct AppState<R: BillingRepository, G: CardCharger> {
    pub registration: CustomerRegistrationService<Arc<R>, PhoneNumberRules>,
    pub payments: PaymentService<Arc<R>, Arc<R>, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Policy(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Declined(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Policy(msg)
            | AppError::Declined(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Gateway(e) => e.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be blank", field)));
    }
    Ok(())
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid customer ID".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Customers
// ─────────────────────────────────────────────────────────────────────────────

/// Register a customer.
#[tracing::instrument(skip(state, req), fields(phone_number = %req.customer.phone_number))]
pub async fn register_customer<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<CustomerRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_blank("name", &req.customer.name)?;
    require_non_blank("phone_number", &req.customer.phone_number)?;

    state.registration.register(req).await?;
    Ok(StatusCode::OK)
}

/// Get customer by ID.
#[tracing::instrument(skip(state), fields(customer_id = %id))]
pub async fn get_customer<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = parse_customer_id(&id)?;

    let customer = state.registration.get_customer(customer_id).await?;
    Ok(Json(CustomerResponse::from(customer)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

fn validate_payment_request(req: &PaymentRequest) -> Result<(), AppError> {
    require_non_blank("source", &req.payment.source)?;
    require_non_blank("description", &req.payment.description)
}

/// Charge the card of the customer named in the path.
#[tracing::instrument(skip(state, req), fields(customer_id = %id))]
pub async fn charge_customer<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = parse_customer_id(&id)?;
    validate_payment_request(&req)?;

    let payment = state.payments.charge_card(customer_id, req).await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// Charge a card for the customer named in the request body.
#[tracing::instrument(skip(state, req))]
pub async fn make_payment<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = req
        .payment
        .customer_id
        .ok_or_else(|| AppError::Validation("customer_id is required".into()))?;
    validate_payment_request(&req)?;

    let payment = state.payments.charge_card(customer_id, req).await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// Get payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid payment ID".into()))?;

    let payment = state.payments.get_payment(payment_id).await?;
    Ok(Json(PaymentResponse::from(payment)))
}

/// List payments for a customer.
#[tracing::instrument(skip(state), fields(customer_id = %id))]
pub async fn list_customer_payments<R: BillingRepository, G: CardCharger>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = parse_customer_id(&id)?;

    let payments: Vec<PaymentResponse> = state
        .payments
        .list_payments(customer_id)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();
    Ok(Json(payments))
}
