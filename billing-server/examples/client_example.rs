//! Client example demonstrating registration and payment flows against a running server.
//!
//! Run with: cargo run -p billing-server --example client_example

use std::net::SocketAddr;
use std::sync::Arc;

use billing_client::BillingClient;
use billing_hex::inbound::HttpServer;
use billing_repo::build_repo;
use billing_types::{Currency, PhoneNumberRules};
use card_gateway::SimulatedCardCharger;
use rust_decimal_macros::dec;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr}...");

    let repo = Arc::new(build_repo("memory://").await?);
    let server = HttpServer::from_parts(
        repo,
        PhoneNumberRules::default(),
        SimulatedCardCharger::always_debit(),
    );
    let router = server.router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    let client = BillingClient::new(format!("http://{addr}"));

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: registration and card payments
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let alex = billing_types::CustomerId::new();
    client
        .register_customer(Some(alex), "Alex", "+447000000000")
        .await?;
    println!("✅ Registered Alex (id={alex})");

    // Same registration again is accepted
    client
        .register_customer(Some(alex), "Alex", "+447000000000")
        .await?;
    println!("✅ Repeated registration accepted");

    if let Err(e) = client
        .register_customer(None, "Sam", "+447000000000")
        .await
    {
        println!("✅ Phone number reuse rejected: {e}");
    }

    let payment = client
        .charge(alex, dec!(10.50), Currency::GBP, "tok_visa", "Shoes")
        .await?;
    println!(
        "✅ Charged {} {} (payment={})",
        payment.amount, payment.currency, payment.id
    );

    if let Err(e) = client
        .charge(alex, dec!(5.00), Currency::EUR, "tok_visa", "Hat")
        .await
    {
        println!("✅ EUR rejected: {e}");
    }

    let payments = client.list_payments(alex).await?;
    println!("\n📋 Payments for Alex:");
    for p in payments {
        println!("   - #{} {} {} ({})", p.id, p.amount, p.currency, p.description);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
