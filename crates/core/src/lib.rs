//! Marketsync Core - Canonical marketplace model and adapter contract.
//!
//! This crate provides the platform-agnostic pieces shared by every
//! marketplace integration:
//! - `adapters` - Platform clients (Shopify REST) built on this contract
//! - `cli` - Operator tooling that drives an adapter
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no runtime. Platform crates implement [`MarketplaceAdapter`] and normalize
//! their wire schema into the canonical records defined here.
//!
//! # Modules
//!
//! - [`types`] - Canonical products, orders, categories, credentials, pagination
//! - [`error`] - The classified error taxonomy and [`OperationResult`]
//! - [`report`] - Per-item accounting for batch writes
//! - [`adapter`] - The adapter contract and optional capability traits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adapter;
pub mod error;
pub mod report;
pub mod types;

pub use adapter::{CollectionManagement, ConnectionStatus, MarketplaceAdapter};
pub use error::{ErrorCode, ErrorInfo, MarketplaceError, OperationResult};
pub use report::{BatchFailure, BatchReport};
pub use types::*;
