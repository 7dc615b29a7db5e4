//! Configuration loading from environment.

use std::env;

use billing_types::PhoneNumberRules;

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gateway: GatewayConfig,
    pub phone_prefixes: Vec<String>,
    pub log_format: LogFormat,
}

/// Which card charger the server talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayConfig {
    Simulated { debit: bool },
    Stripe { api_key: String, api_base: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "memory://".to_string());

        let gateway = match lookup("CARD_GATEWAY").as_deref() {
            None | Some("simulated") => {
                let debit = match lookup("SIMULATED_CARD_DEBIT") {
                    Some(v) => parse_bool(&v)
                        .ok_or_else(|| anyhow::anyhow!("SIMULATED_CARD_DEBIT must be true or false"))?,
                    None => true,
                };
                GatewayConfig::Simulated { debit }
            }
            Some("stripe") => {
                let api_key = lookup("STRIPE_API_KEY").ok_or_else(|| {
                    anyhow::anyhow!("STRIPE_API_KEY is required when CARD_GATEWAY=stripe")
                })?;
                let api_base = lookup("STRIPE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string());
                GatewayConfig::Stripe { api_key, api_base }
            }
            Some(other) => anyhow::bail!("unknown CARD_GATEWAY: {}", other),
        };

        let phone_prefixes = match lookup("PHONE_ALLOWED_PREFIXES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            None => PhoneNumberRules::default().allowed_prefixes().to_vec(),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            port,
            database_url,
            gateway,
            phone_prefixes,
            log_format,
        })
    }

    /// Phone number rules built from the configured prefixes.
    pub fn phone_rules(&self) -> PhoneNumberRules {
        PhoneNumberRules::with_prefixes(self.phone_prefixes.iter().cloned())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
