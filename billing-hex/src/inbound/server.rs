//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use billing_types::{BillingRepository, CardCharger, PhoneNumberRules};

use super::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use crate::{CustomerRegistrationService, PaymentService};

/// HTTP Server for the Billing API.
pub struct HttpServer<R: BillingRepository, G: CardCharger> {
    state: Arc<AppState<R, G>>,
}

impl<R: BillingRepository, G: CardCharger> HttpServer<R, G> {
    /// Creates a new HTTP server from the two application services.
    pub fn new(
        registration: CustomerRegistrationService<Arc<R>, PhoneNumberRules>,
        payments: PaymentService<Arc<R>, Arc<R>, G>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                registration,
                payments,
            }),
        }
    }

    /// Creates a server whose services share one repository.
    pub fn from_parts(repo: Arc<R>, phone_rules: PhoneNumberRules, charger: G) -> Self {
        let registration = CustomerRegistrationService::new(repo.clone(), phone_rules);
        let payments = PaymentService::new(repo.clone(), repo, charger);
        Self::new(registration, payments)
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/v1/customer-registration",
                post(handlers::register_customer::<R, G>),
            )
            .route("/api/v1/customers/{id}", get(handlers::get_customer::<R, G>))
            .route(
                "/api/v1/customers/{id}/payments",
                post(handlers::charge_customer::<R, G>)
                    .get(handlers::list_customer_payments::<R, G>),
            )
            .route("/api/v1/payment", post(handlers::make_payment::<R, G>))
            .route("/api/v1/payments/{id}", get(handlers::get_payment::<R, G>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
