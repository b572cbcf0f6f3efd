//! # Repository Module
//!
//! Database repository implementations for the inventory backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Writes What                                      │
//! │                                                                         │
//! │  ProductService                                                         │
//! │       │                                                                 │
//! │       ├── db.products()  ─►  products, variants, variant_options,       │
//! │       │                      combinations, combination links            │
//! │       │                      (stock columns only at creation, = 0)      │
//! │       │                                                                 │
//! │       ├── db.stock()     ─►  combination stock + products.total_stock   │
//! │       │                      (the only writer after creation)           │
//! │       │                                                                 │
//! │       └── db.logs()      ─►  logs (append only)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Creation and aggregate reads
//! - [`StockLedger`](stock::StockLedger) - Guarded stock adjustments
//! - [`LogRepository`](log::LogRepository) - Failure log sink

pub mod log;
pub mod product;
pub mod stock;
