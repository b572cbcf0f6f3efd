//! # inventory-db: Database Layer for the Inventory Backend
//!
//! Persistence, the stock ledger and the caller-facing [`ProductService`].
//! SQLite through sqlx, fully async.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventory Data Flow                              │
//! │                                                                         │
//! │  Caller (HTTP handler, admin tool, seed binary)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   inventory-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ProductService ── validation, errors, failure logging         │   │
//! │  │        │                                                        │   │
//! │  │   ┌────┴──────────┬──────────────────┬────────────────┐        │   │
//! │  │   │ Product       │ StockLedger      │ LogRepository  │        │   │
//! │  │   │ Repository    │ (stock writes)   │ (append only)  │        │   │
//! │  │   └───────────────┴──────────────────┴────────────────┘        │   │
//! │  │        │                                                        │   │
//! │  │   Database (pool.rs) + embedded migrations                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (INVENTORY_DB_PATH)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Products, stock ledger, log sink
//! - [`service`] - Validated operations for callers
//! - [`config`] - Environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_db::{Database, InventoryConfig, ProductService};
//!
//! let config = InventoryConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//! let service = ProductService::new(db).with_max_combinations(config.max_combinations);
//!
//! let id = service.create_product(&new_product).await?;
//! let detail = service.get_product(&id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, InventoryConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{ErrorCode, ProductService, ServiceError, ServiceResult};

// Repository re-exports for convenience
pub use repository::log::LogRepository;
pub use repository::product::ProductRepository;
pub use repository::stock::StockLedger;
