//! # inventory-core: Pure Domain Logic for the Inventory Backend
//!
//! Everything here is deterministic and free of I/O: the combination
//! generator, the aggregate folding used by the read path, domain types and
//! input validation. `inventory-db` builds the storage layer on top.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventory Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Callers (admin API, seed tool, tests)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            inventory-db: ProductService, repositories           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ inventory-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │ combination │  │ aggregate │  │validation│  │   │
//! │  │   │  Product  │  │  cartesian  │  │  folding  │  │  rules   │  │   │
//! │  │   │  Detail   │  │  product    │  │  rows     │  │  checks  │  │   │
//! │  │   └───────────┘  └─────────────┘  └───────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use inventory_core::combination::{cartesian_product, combination_code};
//!
//! let sizes = vec!["S".to_string(), "M".to_string()];
//! let colors = vec!["Red".to_string(), "Blue".to_string()];
//!
//! let codes: Vec<String> = cartesian_product(&[sizes, colors])
//!     .iter()
//!     .map(|selection| combination_code(selection))
//!     .collect();
//!
//! assert_eq!(codes, ["S-Red", "S-Blue", "M-Red", "M-Blue"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod combination;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Separator between option names in a combination code (`S-Red`).
///
/// Option names may not contain it; see [`validation::validate_variants`].
pub const COMBINATION_CODE_DELIMITER: char = '-';

/// Default ceiling on combinations generated for one product.
///
/// Ten variants with three options each would already be 59,049 rows,
/// so creation requests above this are rejected instead of materialized.
pub const MAX_COMBINATIONS: usize = 10_000;

/// Largest quantity accepted by a single stock adjustment.
pub const MAX_STOCK_ADJUSTMENT: i64 = 1_000_000;

/// Largest page size accepted for product listings.
pub const MAX_PAGE_SIZE: u32 = 100;
