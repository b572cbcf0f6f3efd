//! # Domain Types
//!
//! Core domain types used throughout the inventory backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │ 1 │    Variant      │ 1 │   VariantOption      │  │
//! │  │  ─────────────  │──►│  ─────────────  │──►│  ──────────────────  │  │
//! │  │  id (UUID)      │ n │  name ("Size")  │ n │  name ("M")          │  │
//! │  │  code, name     │   │  position       │   │  position            │  │
//! │  │  total_stock    │   └─────────────────┘   └──────────────────────┘  │
//! │  └────────┬────────┘                                   ▲               │
//! │           │ 1..n                                       │ one per       │
//! │           ▼                                            │ variant       │
//! │  ┌──────────────────────────┐      ┌───────────────────┴──────────┐   │
//! │  │ ProductVariantCombination│ 1  n │ CombinationOption link       │   │
//! │  │  combination_code "M-Red"│─────►│ (combination, variant, opt)  │   │
//! │  │  stock >= 0              │      └──────────────────────────────┘   │
//! │  └──────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Model vs Rows
//! - `*Row` types mirror a single joined SQL row (used by inventory-db).
//! - `ProductDetail` is the folded read model returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A product row as stored in the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code entered by the creator.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Identity of the user who created the product.
    pub created_by: String,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product row was last touched (stock changes included).
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Denormalized sum of every combination's stock.
    pub total_stock: i64,
}

// =============================================================================
// Creation Input
// =============================================================================

/// One variant dimension in a create request, e.g. `Size: [S, M, L]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVariant {
    pub name: String,
    pub options: Vec<String>,
}

impl NewVariant {
    /// Convenience constructor, mostly for tests and seeding.
    pub fn new<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NewVariant {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Input for creating a product together with its variant matrix.
///
/// Variant order matters: it fixes the column order of every
/// generated combination code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub created_by: String,
    pub variants: Vec<NewVariant>,
}

// =============================================================================
// Read Model
// =============================================================================

/// A variant with its option names, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantGroup {
    pub name: String,
    pub options: Vec<String>,
}

/// The option a combination selected for one variant dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionSelection {
    pub variant: String,
    pub option: String,
}

/// One stock-keeping unit of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CombinationDetail {
    pub id: String,
    pub combination_code: String,
    pub stock: i64,
    pub options: Vec<OptionSelection>,
}

/// Product read model: identity, variants and combinations folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    pub code: String,
    pub name: String,
    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total_stock: i64,
    pub variants: Vec<VariantGroup>,
    pub combinations: Vec<CombinationDetail>,
}

impl ProductDetail {
    /// Creates a detail with no variants or combinations yet.
    pub fn from_product(product: &Product) -> Self {
        ProductDetail {
            id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            created_by: product.created_by.clone(),
            created_at: product.created_at,
            total_stock: product.total_stock,
            variants: Vec::new(),
            combinations: Vec::new(),
        }
    }

    /// Sum of the per-combination stock counters.
    ///
    /// Equals `total_stock` for any committed state.
    pub fn combination_stock_sum(&self) -> i64 {
        self.combinations.iter().map(|c| c.stock).sum()
    }

    /// Looks up a combination by its code.
    pub fn combination(&self, code: &str) -> Option<&CombinationDetail> {
        self.combinations
            .iter()
            .find(|c| c.combination_code == code)
    }
}

// =============================================================================
// Join Rows
// =============================================================================

/// One `(variant, option)` pair of a product, from the variants/options join.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VariantOptionRow {
    pub product_id: String,
    pub variant_name: String,
    pub option_name: String,
}

/// One link row of a combination, from the combinations/links/options join.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CombinationOptionRow {
    pub product_id: String,
    pub combination_id: String,
    pub combination_code: String,
    pub stock: i64,
    pub variant_name: String,
    pub option_name: String,
}

// =============================================================================
// Stock
// =============================================================================

/// A stock adjustment request for one combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub combination_id: String,
    pub quantity: i64,
}

/// Stock levels after a successful ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    /// New stock of the combination.
    pub stock: i64,
    /// New total stock of the owning product.
    pub total_stock: i64,
}

/// Outcome of a stock ledger operation.
///
/// "Not found" and "insufficient" are ordinary outcomes, not errors,
/// so callers can branch on them without inspecting error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// Both the combination and the product total were updated.
    Applied(StockLevel),
    /// The combination id does not exist. Nothing was written.
    NotFound,
    /// Removal would drive stock negative. Nothing was written.
    Insufficient { available: i64, requested: i64 },
}

impl StockChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, StockChange::Applied(_))
    }
}

// =============================================================================
// Logs
// =============================================================================

/// Severity stored with each log-sink entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// An entry in the append-only `logs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
