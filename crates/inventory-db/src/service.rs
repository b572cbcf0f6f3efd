//! # Product Service
//!
//! Caller-facing boundary over the repositories: validates input, enforces the
//! combination ceiling, turns repository outcomes into [`ServiceError`]s and
//! records every failure in the log sink.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller ──► ProductService::remove_stock(update)                        │
//! │                  │                                                      │
//! │                  ├── validate_uuid / validate_quantity                  │
//! │                  │        └─ Err ──► ServiceError::Validation           │
//! │                  ▼                                                      │
//! │             StockLedger::remove_stock                                   │
//! │                  │                                                      │
//! │                  ├── Applied      ──► Ok(StockLevel)                    │
//! │                  ├── NotFound     ──► ServiceError::CombinationNotFound │
//! │                  └── Insufficient ──► ServiceError::InsufficientStock   │
//! │                                                                         │
//! │  Any Err ──► tracing event + logs.append_detached (not awaited)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

use inventory_core::combination::ensure_within_limit;
use inventory_core::validation::{
    validate_new_product, validate_page, validate_quantity, validate_uuid,
};
use inventory_core::{
    CoreError, LogLevel, NewProduct, ProductDetail, StockChange, StockLevel, StockUpdate,
    ValidationError,
};

use crate::error::DbError;
use crate::pool::Database;

// =============================================================================
// Errors
// =============================================================================

/// Stable machine-readable error codes.
///
/// Serialized as `NOT_FOUND`, `VALIDATION_ERROR`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or combination id does not resolve
    NotFound,

    /// Input rejected before touching the store
    ValidationError,

    /// Removal larger than the available stock
    InsufficientStock,

    /// Variant matrix above the combination ceiling
    LimitExceeded,

    /// Store failure
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::LimitExceeded => "LIMIT_EXCEEDED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`ProductService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Combination not found: {0}")]
    CombinationNotFound(String),

    #[error(
        "Insufficient stock for combination {combination_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        combination_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Variant matrix yields {count} combinations, maximum is {max}")]
    TooManyCombinations { count: usize, max: usize },

    #[error("Database error: {0}")]
    Store(#[from] DbError),
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::ProductNotFound(_) | ServiceError::CombinationNotFound(_) => {
                ErrorCode::NotFound
            }
            ServiceError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            ServiceError::TooManyCombinations { .. } => ErrorCode::LimitExceeded,
            ServiceError::Store(_) => ErrorCode::DatabaseError,
        }
    }

    /// Log level used when this failure is recorded.
    fn level(&self) -> LogLevel {
        match self {
            ServiceError::Store(_) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TooManyCombinations { count, max } => {
                ServiceError::TooManyCombinations { count, max }
            }
            CoreError::Validation(e) => ServiceError::Validation(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Service
// =============================================================================

/// Product inventory operations.
///
/// ## Usage
/// ```rust,ignore
/// let service = ProductService::new(db).with_max_combinations(config.max_combinations);
///
/// let id = service.create_product(&new_product).await?;
/// let detail = service.get_product(&id).await?;
/// let level = service
///     .add_stock(&StockUpdate { combination_id: detail.combinations[0].id.clone(), quantity: 5 })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
    max_combinations: usize,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService {
            db,
            max_combinations: inventory_core::MAX_COMBINATIONS,
        }
    }

    /// Overrides the combination ceiling.
    pub fn with_max_combinations(mut self, max: usize) -> Self {
        self.max_combinations = max;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a product with every combination of its variant options.
    ///
    /// ## Returns
    /// The new product's id. All stocks start at zero.
    pub async fn create_product(&self, new: &NewProduct) -> ServiceResult<String> {
        let result = self.try_create_product(new).await;
        self.observe("create product", result)
    }

    async fn try_create_product(&self, new: &NewProduct) -> ServiceResult<String> {
        validate_new_product(new)?;
        let count = ensure_within_limit(
            new.variants.iter().map(|v| v.options.len()),
            self.max_combinations,
        )?;

        let id = self.db.products().create(new).await?;
        info!(product_id = %id, combinations = count, "Product created");
        Ok(id)
    }

    /// Fetches one product aggregate.
    pub async fn get_product(&self, id: &str) -> ServiceResult<ProductDetail> {
        let result = self.try_get_product(id).await;
        self.observe("get product", result)
    }

    async fn try_get_product(&self, id: &str) -> ServiceResult<ProductDetail> {
        validate_uuid(id)?;
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::ProductNotFound(id.to_string()))
    }

    /// Fetches a page of product aggregates, newest first.
    ///
    /// `page` is 1-based. A page past the end is empty.
    pub async fn list_products(
        &self,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<Vec<ProductDetail>> {
        let result = self.try_list_products(page, page_size).await;
        self.observe("list products", result)
    }

    async fn try_list_products(
        &self,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<Vec<ProductDetail>> {
        validate_page(page, page_size)?;
        Ok(self.db.products().list(page, page_size).await?)
    }

    /// Adds stock to a combination.
    pub async fn add_stock(&self, update: &StockUpdate) -> ServiceResult<StockLevel> {
        let result = self.try_adjust(update, true).await;
        self.observe("add stock", result)
    }

    /// Removes stock from a combination. Never drives stock below zero.
    pub async fn remove_stock(&self, update: &StockUpdate) -> ServiceResult<StockLevel> {
        let result = self.try_adjust(update, false).await;
        self.observe("remove stock", result)
    }

    async fn try_adjust(&self, update: &StockUpdate, add: bool) -> ServiceResult<StockLevel> {
        validate_uuid(&update.combination_id)?;
        validate_quantity(update.quantity)?;

        let ledger = self.db.stock();
        let change = if add {
            ledger.add_stock(&update.combination_id, update.quantity).await?
        } else {
            ledger
                .remove_stock(&update.combination_id, update.quantity)
                .await?
        };

        match change {
            StockChange::Applied(level) => Ok(level),
            StockChange::NotFound => Err(ServiceError::CombinationNotFound(
                update.combination_id.clone(),
            )),
            StockChange::Insufficient {
                available,
                requested,
            } => Err(ServiceError::InsufficientStock {
                combination_id: update.combination_id.clone(),
                available,
                requested,
            }),
        }
    }

    /// Traces a failed operation and appends it to the log sink.
    fn observe<T>(&self, operation: &str, result: ServiceResult<T>) -> ServiceResult<T> {
        if let Err(err) = &result {
            let level = err.level();
            match level {
                LogLevel::Error => error!(operation, code = %err.code(), error = %err, "Operation failed"),
                _ => warn!(operation, code = %err.code(), error = %err, "Operation rejected"),
            }
            self.db
                .logs()
                .append_detached(level, format!("{operation}: {err}"));
        }
        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use inventory_core::{LogEntry, NewVariant};
    use std::time::Duration;
    use uuid::Uuid;

    async fn service() -> ProductService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductService::new(db)
    }

    fn shirt() -> NewProduct {
        NewProduct {
            code: "TS".to_string(),
            name: "T-Shirt".to_string(),
            created_by: "admin".to_string(),
            variants: vec![
                NewVariant::new("Size", ["S", "M", "L"]),
                NewVariant::new("Color", ["Red", "Blue"]),
            ],
        }
    }

    /// Waits for detached log writes to land.
    async fn wait_for_logs(service: &ProductService, expected: usize) -> Vec<LogEntry> {
        let logs = service.database().logs();
        for _ in 0..50 {
            let entries = logs.recent(100).await.unwrap();
            if entries.len() >= expected {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        logs.recent(100).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service().await;
        let id = service.create_product(&shirt()).await.unwrap();

        let detail = service.get_product(&id).await.unwrap();
        assert_eq!(detail.code, "TS");
        assert_eq!(detail.combinations.len(), 6);
        assert_eq!(detail.total_stock, 0);
        assert!(detail.combination("S-Red").is_some());
        assert!(detail.combination("L-Blue").is_some());
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected_and_logged() {
        let service = service().await;
        let mut new = shirt();
        new.variants.clear();

        let err = service.create_product(&new).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(service.database().products().count().await.unwrap(), 0);

        let entries = wait_for_logs(&service, 1).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert!(entries[0].message.starts_with("create product: "));
    }

    #[tokio::test]
    async fn test_combination_ceiling() {
        let service = service().await.with_max_combinations(5);

        let err = service.create_product(&shirt()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::TooManyCombinations {
                count: 6,
                max: 5
            }
        ));
        assert_eq!(err.code(), ErrorCode::LimitExceeded);
        assert_eq!(service.database().products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids() {
        let service = service().await;

        let err = service
            .get_product(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotFound(_)));
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service.get_product("nope").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_stock_round_trip() {
        let service = service().await;
        let id = service.create_product(&shirt()).await.unwrap();
        let detail = service.get_product(&id).await.unwrap();
        let combination_id = detail.combinations[0].id.clone();

        let level = service
            .add_stock(&StockUpdate {
                combination_id: combination_id.clone(),
                quantity: 5,
            })
            .await
            .unwrap();
        assert_eq!(
            level,
            StockLevel {
                stock: 5,
                total_stock: 5
            }
        );

        let level = service
            .remove_stock(&StockUpdate {
                combination_id,
                quantity: 5,
            })
            .await
            .unwrap();
        assert_eq!(
            level,
            StockLevel {
                stock: 0,
                total_stock: 0
            }
        );
    }

    #[tokio::test]
    async fn test_insufficient_and_missing_are_distinct() {
        let service = service().await;
        let id = service.create_product(&shirt()).await.unwrap();
        let detail = service.get_product(&id).await.unwrap();

        let err = service
            .remove_stock(&StockUpdate {
                combination_id: detail.combinations[0].id.clone(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));
        assert_eq!(err.code(), ErrorCode::InsufficientStock);

        let err = service
            .add_stock(&StockUpdate {
                combination_id: Uuid::new_v4().to_string(),
                quantity: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CombinationNotFound(_)));

        let after = service.get_product(&id).await.unwrap();
        assert_eq!(after.total_stock, 0);
        assert_eq!(after.combination_stock_sum(), 0);

        assert_eq!(wait_for_logs(&service, 2).await.len(), 2);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected() {
        let service = service().await;
        let id = service.create_product(&shirt()).await.unwrap();
        let detail = service.get_product(&id).await.unwrap();

        for quantity in [0, -3] {
            let err = service
                .add_stock(&StockUpdate {
                    combination_id: detail.combinations[0].id.clone(),
                    quantity,
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }

        let after = service.get_product(&id).await.unwrap();
        assert_eq!(after.combinations[0].stock, 0);
    }

    #[tokio::test]
    async fn test_list_products_pages() {
        let service = service().await;
        for i in 0..3 {
            let mut new = shirt();
            new.code = format!("TS-{i}");
            service.create_product(&new).await.unwrap();
        }

        let first = service.list_products(1, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].code, "TS-2");

        let second = service.list_products(2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].code, "TS-0");
        assert_eq!(second[0].combinations.len(), 6);

        assert!(service.list_products(5, 2).await.unwrap().is_empty());

        let err = service.list_products(0, 2).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(
            serde_json::to_string(&ErrorCode::InsufficientStock).unwrap(),
            "\"INSUFFICIENT_STOCK\""
        );

        let err = ServiceError::CombinationNotFound("c1".to_string());
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.to_string(), "Combination not found: c1");
    }

    #[test]
    fn test_core_errors_keep_their_codes() {
        let err: ServiceError = CoreError::TooManyCombinations {
            count: 12,
            max: 10,
        }
        .into();
        assert!(matches!(
            err,
            ServiceError::TooManyCombinations {
                count: 12,
                max: 10
            }
        ));
        assert_eq!(err.code(), ErrorCode::LimitExceeded);

        let err: ServiceError = CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
    }
}
