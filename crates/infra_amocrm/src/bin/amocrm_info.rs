//! amoCRM account inspector
//!
//! Authenticates with the configured credentials and prints the account
//! metadata returned by `accounts/current`, including the custom field
//! catalogue whose ids go into the `custom_fields` table.
//!
//! # Usage
//!
//! ```bash
//! AMO_SUBDOMAIN=prosto AMO_USER_LOGIN=robot@prosto.insure AMO_USER_HASH=... \
//!     cargo run --bin amocrm-info
//! ```
//!
//! # Environment Variables
//!
//! * `AMO_CONFIG_FILE` - Optional config file (default: config/amocrm)
//! * `AMO_SUBDOMAIN` - Account subdomain
//! * `AMO_USER_LOGIN` - API user login
//! * `AMO_USER_HASH` - API user hash
//! * `AMO_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use anyhow::Context;
use infra_amocrm::{AmoCrmConfig, AmoGateway, CrmGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AmoCrmConfig::from_env().context("failed to load amoCRM configuration")?;
    init_tracing(&config.log_level);
    config.validate()?;

    let missing = config.field_registry().missing_names();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Custom field table is incomplete");
    }

    tracing::info!(subdomain = %config.subdomain, "Fetching account metadata");

    let gateway = AmoGateway::from_config(&config)?;
    let account = gateway.account_info().await?;
    if !gateway.auth().is_authenticated().await {
        anyhow::bail!("authentication failed, check AMO_USER_LOGIN and AMO_USER_HASH");
    }

    println!("{}", serde_json::to_string_pretty(&account)?);
    Ok(())
}

/// Initializes the tracing subscriber, preferring `RUST_LOG` when set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
