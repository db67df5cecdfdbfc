//! Subcommand implementations.
//!
//! Every command talks to the store through a [`ShopifyAdapter`] built from
//! the environment (see `marketsync_adapters::config`).

pub mod catalog;
pub mod orders;

use marketsync_adapters::{AdapterConfig, ShopifyAdapter, credentials_from_env};
use marketsync_core::{
    BatchReport, ConnectionStatus, MarketplaceAdapter, PriceUpdate, ProductStatus, StatusUpdate, StockUpdate,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Build an adapter from `MARKETSYNC_*` settings. Does not touch the network.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build_adapter() -> Result<ShopifyAdapter, Box<dyn std::error::Error>> {
    let config = AdapterConfig::from_env()?;
    Ok(ShopifyAdapter::new(config)?)
}

/// Initialize the adapter with credentials from the environment.
///
/// # Errors
///
/// Returns an error if credentials are missing or the store is unreachable.
pub async fn initialize(adapter: &ShopifyAdapter) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = credentials_from_env()?;
    adapter.initialize(credentials).await?;
    info!(platform = adapter.platform(), "Adapter initialized");
    Ok(())
}

pub async fn disconnect(adapter: &ShopifyAdapter) {
    adapter.close().await;
}

/// Print the connection status. A failed initialize is reported, not raised.
///
/// # Errors
///
/// Returns an error if credentials are missing from the environment.
pub async fn test_connection(adapter: &ShopifyAdapter) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = credentials_from_env()?;
    let status = match adapter.initialize(credentials).await {
        Ok(()) => adapter.test_connection().await,
        Err(e) => ConnectionStatus::disconnected(e.to_string()),
    };
    print_json(&status)?;
    if status.connected {
        Ok(())
    } else {
        Err(status.message.into())
    }
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a batch report; any failed item makes the command fail.
pub fn finish_batch(report: &BatchReport) -> Result<(), Box<dyn std::error::Error>> {
    print_json(report)?;
    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} of {} items failed", report.failed.len(), report.total()).into())
    }
}

fn split_assignment(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((sku, value)) if !sku.trim().is_empty() && !value.trim().is_empty() => {
            Ok((sku.trim(), value.trim()))
        }
        _ => Err(format!("expected SKU=VALUE, got {arg:?}")),
    }
}

/// Parse `SKU=QUANTITY`.
pub fn parse_stock(arg: &str) -> Result<StockUpdate, String> {
    let (sku, quantity) = split_assignment(arg)?;
    let quantity = quantity
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;
    Ok(StockUpdate::new(sku, quantity))
}

/// Parse `SKU=PRICE`.
pub fn parse_price(arg: &str) -> Result<PriceUpdate, String> {
    let (sku, price) = split_assignment(arg)?;
    let price = price
        .parse::<Decimal>()
        .map_err(|e| format!("invalid price {price:?}: {e}"))?;
    Ok(PriceUpdate::new(sku, price))
}

/// Parse `SKU=STATUS`.
pub fn parse_status(arg: &str) -> Result<StatusUpdate, String> {
    let (sku, status) = split_assignment(arg)?;
    let status = status.parse::<ProductStatus>()?;
    Ok(StatusUpdate::new(sku, status))
}
