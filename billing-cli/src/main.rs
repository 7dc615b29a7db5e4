//! Billing CLI
//!
//! Command-line interface for the Billing API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use billing_client::BillingClient;
use billing_types::{Currency, CustomerId};

#[derive(Parser)]
#[command(name = "billing")]
#[command(author, version, about = "Billing API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Billing API
    #[arg(long, env = "BILLING_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Customer operations
    Customer {
        #[command(subcommand)]
        action: CustomerCommands,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// Register a customer (repeating the same registration is fine)
    Register {
        /// Customer name
        name: String,
        /// Phone number in international format, e.g. +447000000000
        #[arg(long)]
        phone: String,
        /// Optional customer ID (UUID); assigned by the server when absent
        #[arg(long)]
        id: Option<String>,
    },
    /// Get customer details
    Get {
        /// Customer ID (UUID)
        id: String,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Charge a customer's card
    Charge {
        #[arg(long)]
        customer: String,
        /// Amount in major units, e.g. 10.50
        #[arg(long)]
        amount: Decimal,
        /// Currency (USD, GBP)
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Card or source token
        #[arg(long)]
        source: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Get payment details
    Get {
        /// Payment ID
        id: i64,
    },
    /// List a customer's payments
    List {
        #[arg(long)]
        customer: String,
    },
}

fn parse_currency(s: &str) -> Result<Currency> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Unknown currency: {}. Supported: USD, GBP, EUR", s))
}

fn parse_customer_id(s: &str) -> Result<CustomerId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid customer ID: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = BillingClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Customer { action } => match action {
            CustomerCommands::Register { name, phone, id } => {
                let id = id.as_deref().map(parse_customer_id).transpose()?;
                client.register_customer(id, &name, &phone).await?;
                println!("✓ Customer {} registered with {}", name, phone);
            }
            CustomerCommands::Get { id } => {
                let customer_id = parse_customer_id(&id)?;
                let customer = client.get_customer(customer_id).await?;
                println!("{}", serde_json::to_string_pretty(&customer)?);
            }
        },

        Commands::Payment { action } => match action {
            PaymentCommands::Charge {
                customer,
                amount,
                currency,
                source,
                description,
            } => {
                let customer_id = parse_customer_id(&customer)?;
                let currency = parse_currency(&currency)?;
                let payment = client
                    .charge(customer_id, amount, currency, &source, &description)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::Get { id } => {
                let payment = client.get_payment(id).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::List { customer } => {
                let customer_id = parse_customer_id(&customer)?;
                let payments = client.list_payments(customer_id).await?;
                println!("{}", serde_json::to_string_pretty(&payments)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_charge_command() {
        let cli = Cli::try_parse_from([
            "billing",
            "payment",
            "charge",
            "--customer",
            "6f1c1f5e-8d1e-4b8a-9c1b-0a4f6d2e3b7c",
            "--amount",
            "10.50",
            "--currency",
            "gbp",
            "--source",
            "tok_visa",
        ])
        .unwrap();

        match cli.command {
            Commands::Payment {
                action: PaymentCommands::Charge {
                    amount, currency, ..
                },
            } => {
                assert_eq!(amount, Decimal::new(1050, 2));
                assert_eq!(parse_currency(&currency).unwrap(), Currency::GBP);
            }
            _ => panic!("expected payment charge"),
        }
    }

    #[test]
    fn test_invalid_customer_id_is_rejected() {
        assert!(parse_customer_id("not-a-uuid").is_err());
    }
}
