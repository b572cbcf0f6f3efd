//! # Stock Ledger
//!
//! The only code path that writes `product_variant_combinations.stock` and
//! `products.total_stock`.
//!
//! ## Delta Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Transaction per Adjustment                       │
//! │                                                                         │
//! │  1. UPDATE product_variant_combinations                                 │
//! │        SET stock = stock + Δ                                            │
//! │      WHERE id = ? AND stock + Δ >= 0        ← check and write in one    │
//! │      RETURNING product_id, stock              statement                 │
//! │                                                                         │
//! │     no row? ── SELECT stock ──► NotFound | Insufficient  (rollback)     │
//! │                                                                         │
//! │  2. UPDATE products SET total_stock = total_stock + Δ                   │
//! │      RETURNING total_stock                                              │
//! │                                                                         │
//! │  COMMIT ← combination and product total move together                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The guarded UPDATE is the first statement of its transaction, so a second
//! writer blocks on SQLite's write lock (up to the busy timeout) and then
//! evaluates `stock + Δ >= 0` against the committed value. Two removals of
//! the last 10 units can never both succeed.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use inventory_core::{StockChange, StockLevel};

use crate::error::{DbError, DbResult};

/// Guarded stock adjustments for combinations.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Adds `quantity` units to a combination and its product total.
    ///
    /// `quantity` must be positive; the service boundary enforces this.
    pub async fn add_stock(&self, combination_id: &str, quantity: i64) -> DbResult<StockChange> {
        self.adjust(combination_id, quantity).await
    }

    /// Removes `quantity` units from a combination and its product total.
    ///
    /// ## Returns
    /// * `StockChange::Applied` - Both rows updated
    /// * `StockChange::Insufficient` - Current stock below `quantity`, nothing written
    /// * `StockChange::NotFound` - Unknown combination, nothing written
    pub async fn remove_stock(
        &self,
        combination_id: &str,
        quantity: i64,
    ) -> DbResult<StockChange> {
        self.adjust(combination_id, -quantity).await
    }

    /// Current stock of one combination, if it exists.
    pub async fn combination_stock(&self, combination_id: &str) -> DbResult<Option<i64>> {
        let stock: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM product_variant_combinations WHERE id = ?1")
                .bind(combination_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(stock)
    }

    async fn adjust(&self, combination_id: &str, delta: i64) -> DbResult<StockChange> {
        debug!(combination_id = %combination_id, delta, "Adjusting stock");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let updated: Option<(String, i64)> = sqlx::query_as(
            r#"
            UPDATE product_variant_combinations
            SET stock = stock + ?2
            WHERE id = ?1 AND stock + ?2 >= 0
            RETURNING product_id, stock
            "#,
        )
        .bind(combination_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((product_id, stock)) = updated else {
            let current: Option<i64> = sqlx::query_scalar(
                "SELECT stock FROM product_variant_combinations WHERE id = ?1",
            )
            .bind(combination_id)
            .fetch_optional(&mut *tx)
            .await?;

            // Nothing was written; dropping `tx` rolls back.
            return Ok(match current {
                None => StockChange::NotFound,
                Some(available) => StockChange::Insufficient {
                    available,
                    requested: delta.saturating_abs(),
                },
            });
        };

        let total_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET total_stock = total_stock + ?2,
                updated_at = ?3
            WHERE id = ?1
            RETURNING total_stock
            "#,
        )
        .bind(&product_id)
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        // The foreign key guarantees the product row; a miss aborts the transaction.
        let total_stock = total_stock.ok_or_else(|| DbError::not_found("Product", &product_id))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(
            combination_id = %combination_id,
            product_id = %product_id,
            stock,
            total_stock,
            "Stock adjusted"
        );

        Ok(StockChange::Applied(StockLevel { stock, total_stock }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
