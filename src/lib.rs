//! rendicion - petty-cash expense ledger and rendition reports
//!
//! This library keeps the expenses paid from a fixed petty-cash fund and
//! produces the "rendición de gastos" report that accounts for them.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, expenses, the ledger)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer
//! - `reports`: Report content, text measurement and page layout
//! - `export`: PDF, spreadsheet and CSV emitters
//! - `display`: Terminal tables
//! - `cli`: Command handlers for the `rendicion` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use rendicion::config::{paths::RendicionPaths, settings::Settings};
//! use rendicion::services::LedgerService;
//! use rendicion::storage::Storage;
//!
//! let paths = RendicionPaths::new()?;
//! let storage = Storage::new(paths)?;
//! let ledger = LedgerService::new(&storage).load()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{RendicionError, RendicionResult};
