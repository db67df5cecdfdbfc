//! Marketsync CLI - Drive a marketplace adapter from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Check credentials and connectivity
//! msync test-connection
//!
//! # Look up a product variant
//! msync product --sku TSHIRT-RED-M
//!
//! # Orders from the last day
//! msync orders --since 2024-05-01T00:00:00Z
//!
//! # Bulk stock update
//! msync set-stock TSHIRT-RED-M=12 TSHIRT-RED-L=0
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr.
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` - Store domain (e.g. `my-store.myshopify.com`)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token
//! - `RUST_LOG` - Log filter (default `marketsync=info`)
//! - `LOG_FORMAT` - `json` for structured logs

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use marketsync_adapters::ShopifyAdapter;
use marketsync_core::{PriceUpdate, ProductStatus, StatusUpdate, StockUpdate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "msync")]
#[command(author, version, about = "Marketsync marketplace tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials and connectivity
    TestConnection,
    /// Look up a single product
    Product {
        /// Variant SKU
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        sku: Option<String>,

        /// Canonical (`product-variant`) or platform product id
        #[arg(long)]
        id: Option<String>,
    },
    /// List products
    Products {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 50)]
        page_size: u32,

        /// Only products with this status (`active`, `inactive`, `draft`)
        #[arg(long)]
        status: Option<ProductStatus>,

        /// Continuation token from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// List orders created since a point in time
    Orders {
        /// RFC 3339 timestamp
        #[arg(long)]
        since: DateTime<Utc>,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },
    /// Look up a single order
    Order {
        /// Platform order id
        id: String,
    },
    /// Mark an order as received
    Ack {
        /// Platform order id
        id: String,
    },
    /// Set stock levels
    SetStock {
        /// `SKU=QUANTITY` pairs
        #[arg(required = true, value_parser = commands::parse_stock)]
        items: Vec<StockUpdate>,
    },
    /// Set prices
    SetPrice {
        /// `SKU=PRICE` pairs
        #[arg(required = true, value_parser = commands::parse_price)]
        items: Vec<PriceUpdate>,
    },
    /// Set product status
    SetStatus {
        /// `SKU=STATUS` pairs
        #[arg(required = true, value_parser = commands::parse_status)]
        items: Vec<StatusUpdate>,
    },
    /// List categories
    Categories,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketsync_adapters=info,marketsync_cli=info".into());

    // Stdout carries command output, so logs always go to stderr
    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let adapter = commands::build_adapter()?;

    // test-connection reports a failed initialize instead of aborting on it
    let result = match cli.command {
        Commands::TestConnection => commands::test_connection(&adapter).await,
        command => match commands::initialize(&adapter).await {
            Ok(()) => execute(&adapter, command).await,
            Err(e) => Err(e),
        },
    };

    commands::disconnect(&adapter).await;
    result
}

async fn execute(
    adapter: &ShopifyAdapter,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::TestConnection => commands::test_connection(adapter).await,
        Commands::Product { sku, id } => {
            commands::catalog::product(adapter, sku.as_deref(), id.as_deref()).await
        },
        Commands::Products {
            page,
            page_size,
            status,
            cursor,
        } => commands::catalog::products(adapter, page, page_size, status, cursor).await,
        Commands::Orders {
            since,
            page,
            page_size,
        } => commands::orders::list(adapter, since, page, page_size).await,
        Commands::Order { id } => commands::orders::show(adapter, &id).await,
        Commands::Ack { id } => commands::orders::acknowledge(adapter, &id).await,
        Commands::SetStock { items } => commands::catalog::set_stock(adapter, &items).await,
        Commands::SetPrice { items } => commands::catalog::set_price(adapter, &items).await,
        Commands::SetStatus { items } => commands::catalog::set_status(adapter, &items).await,
        Commands::Categories => commands::catalog::categories(adapter).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_stock() {
        let cli = Cli::try_parse_from(["msync", "set-stock", "A=1", "B=20"]).expect("parses");
        let Commands::SetStock { items } = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(items, vec![StockUpdate::new("A", 1), StockUpdate::new("B", 20)]);
    }

    #[test]
    fn test_product_requires_sku_or_id() {
        assert!(Cli::try_parse_from(["msync", "product"]).is_err());
        assert!(Cli::try_parse_from(["msync", "product", "--sku", "A", "--id", "1"]).is_err());
        assert!(Cli::try_parse_from(["msync", "product", "--id", "632910392"]).is_ok());
    }

    #[test]
    fn test_orders_since_is_rfc3339() {
        assert!(Cli::try_parse_from(["msync", "orders", "--since", "yesterday"]).is_err());
        let cli = Cli::try_parse_from(["msync", "orders", "--since", "2024-05-01T00:00:00Z"])
            .expect("parses");
        assert!(matches!(cli.command, Commands::Orders { page: 1, .. }));
    }
}
