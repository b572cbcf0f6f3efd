//! # Product Repository
//!
//! Product creation (one transaction for the whole variant matrix) and the
//! aggregate read path.
//!
//! ## Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SINGLE TRANSACTION                                   │
//! │                                                                         │
//! │  1. INSERT products                                                     │
//! │  2. INSERT variants, variant_options   (positions = declaration order)  │
//! │  3. plan_combinations(dimensions)      (inventory-core, pure)           │
//! │  4. INSERT product_variant_combinations + one link per variant          │
//! │                                                                         │
//! │  COMMIT ← all rows or none. Any `?` drops the transaction, which rolls │
//! │           back.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reads
//! One query per relation regardless of page size: product rows, then the
//! variant/option join and the combination/link join filtered with
//! `product_id IN (...)`. All three run inside one read transaction so the
//! combination stocks and `total_stock` come from the same snapshot.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use inventory_core::aggregate::build_details;
use inventory_core::combination::{plan_combinations, Dimension, OptionRef};
use inventory_core::{CombinationOptionRow, NewProduct, Product, ProductDetail, VariantOptionRow};

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str =
    "id, code, name, created_by, created_at, updated_at, total_stock";

/// Repository for product creation and aggregate reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let id = repo.create(&new_product).await?;
/// let detail = repo.get_by_id(&id).await?;   // Option<ProductDetail>
/// let page = repo.list(1, 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product with its variants, options, every combination and
    /// every combination link, atomically.
    ///
    /// The input is expected to be validated already (non-empty variants,
    /// non-empty options, unique names, combination count within limits).
    ///
    /// ## Returns
    /// The new product's id.
    pub async fn create(&self, new: &NewProduct) -> DbResult<String> {
        let product_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(product_id = %product_id, code = %new.code, "Creating product");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (id, code, name, created_by, created_at, updated_at, total_stock)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5, 0)
            "#,
        )
        .bind(&product_id)
        .bind(new.code.trim())
        .bind(new.name.trim())
        .bind(new.created_by.trim())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut dimensions = Vec::with_capacity(new.variants.len());
        for (variant_pos, variant) in new.variants.iter().enumerate() {
            let variant_id = Uuid::new_v4().to_string();

            sqlx::query(
                "INSERT INTO variants (id, product_id, name, position) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&variant_id)
            .bind(&product_id)
            .bind(variant.name.trim())
            .bind(variant_pos as i64)
            .execute(&mut *tx)
            .await?;

            let mut options = Vec::with_capacity(variant.options.len());
            for (option_pos, option) in variant.options.iter().enumerate() {
                let option_ref = OptionRef {
                    id: Uuid::new_v4().to_string(),
                    name: option.trim().to_string(),
                };

                sqlx::query(
                    "INSERT INTO variant_options (id, variant_id, name, position) VALUES (?1, ?2, ?3, ?4)",
                )
                .bind(&option_ref.id)
                .bind(&variant_id)
                .bind(&option_ref.name)
                .bind(option_pos as i64)
                .execute(&mut *tx)
                .await?;

                options.push(option_ref);
            }

            dimensions.push(Dimension {
                variant_id,
                options,
            });
        }

        let planned = plan_combinations(&dimensions);
        for (combo_pos, combo) in planned.iter().enumerate() {
            let combination_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO product_variant_combinations (id, product_id, combination_code, stock, position)
                VALUES (?1, ?2, ?3, 0, ?4)
                "#,
            )
            .bind(&combination_id)
            .bind(&product_id)
            .bind(&combo.code)
            .bind(combo_pos as i64)
            .execute(&mut *tx)
            .await?;

            for (variant_id, option_id) in &combo.links {
                sqlx::query(
                    r#"
                    INSERT INTO product_variant_combination_options (combination_id, variant_id, variant_option_id)
                    VALUES (?1, ?2, ?3)
                    "#,
                )
                .bind(&combination_id)
                .bind(variant_id)
                .bind(option_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            product_id = %product_id,
            variants = dimensions.len(),
            combinations = planned.len(),
            "Product created"
        );

        Ok(product_id)
    }

    /// Gets a product's read model by id.
    ///
    /// ## Returns
    /// * `Ok(Some(detail))` - Product found
    /// * `Ok(None)` - No product with this id
    /// * `Err(_)` - Any of the three fetches failed
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductDetail>> {
        debug!(product_id = %id, "Fetching product");

        let mut tx = self.pool.begin().await?;

        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let mut details = load_details(&mut tx, vec![product]).await?;
        tx.commit().await?;

        Ok(details.pop())
    }

    /// Lists a page of products, newest first.
    ///
    /// ## Arguments
    /// * `page` - 1-based page number
    /// * `page_size` - Products per page
    pub async fn list(&self, page: u32, page_size: u32) -> DbResult<Vec<ProductDetail>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);

        debug!(page, page_size, offset, "Listing products");

        let mut tx = self.pool.begin().await?;

        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            PRODUCT_COLUMNS
        ))
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        let details = load_details(&mut tx, products).await?;
        tx.commit().await?;

        debug!(count = details.len(), "Listed products");
        Ok(details)
    }

    /// Counts all products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Batches the two join fetches for `products` and folds the results.
async fn load_details(
    conn: &mut SqliteConnection,
    products: Vec<Product>,
) -> DbResult<Vec<ProductDetail>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = products.iter().map(|p| p.id.clone()).collect();
    let variant_rows = fetch_variant_rows(conn, &ids).await?;
    let combination_rows = fetch_combination_rows(conn, &ids).await?;

    Ok(build_details(&products, variant_rows, combination_rows))
}

fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
}

async fn fetch_variant_rows(
    conn: &mut SqliteConnection,
    product_ids: &[String],
) -> DbResult<Vec<VariantOptionRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT
            v.product_id AS product_id,
            v.name       AS variant_name,
            o.name       AS option_name
        FROM variants v
        INNER JOIN variant_options o ON o.variant_id = v.id
        WHERE v.product_id IN "#,
    );
    push_id_list(&mut qb, product_ids);
    qb.push(" ORDER BY v.product_id, v.position, o.position");

    let rows = qb
        .build_query_as::<VariantOptionRow>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}

async fn fetch_combination_rows(
    conn: &mut SqliteConnection,
    product_ids: &[String],
) -> DbResult<Vec<CombinationOptionRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT
            c.product_id       AS product_id,
            c.id               AS combination_id,
            c.combination_code AS combination_code,
            c.stock            AS stock,
            v.name             AS variant_name,
            o.name             AS option_name
        FROM product_variant_combinations c
        INNER JOIN product_variant_combination_options l ON l.combination_id = c.id
        INNER JOIN variants v ON v.id = l.variant_id
        INNER JOIN variant_options o ON o.id = l.variant_option_id
        WHERE c.product_id IN "#,
    );
    push_id_list(&mut qb, product_ids);
    qb.push(" ORDER BY c.product_id, c.position, v.position");

    let rows = qb
        .build_query_as::<CombinationOptionRow>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use inventory_core::NewVariant;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn tshirt() -> NewProduct {
        NewProduct {
            code: "TSHIRT".to_string(),
            name: "T-Shirt".to_string(),
            created_by: "admin".to_string(),
            variants: vec![
                NewVariant::new("Size", ["S", "M"]),
                NewVariant::new("Color", ["Red", "Blue"]),
            ],
        }
    }

    #[tokio::test]
    async fn test_create_generates_full_matrix() {
        let db = setup().await;
        let id = db.products().create(&tshirt()).await.unwrap();

        let detail = db.products().get_by_id(&id).await.unwrap().unwrap();

        assert_eq!(detail.code, "TSHIRT");
        assert_eq!(detail.total_stock, 0);
        assert_eq!(detail.variants.len(), 2);
        assert_eq!(detail.variants[0].name, "Size");
        assert_eq!(detail.variants[0].options, vec!["S", "M"]);
        assert_eq!(detail.variants[1].options, vec!["Red", "Blue"]);

        let codes: Vec<&str> = detail
            .combinations
            .iter()
            .map(|c| c.combination_code.as_str())
            .collect();
        assert_eq!(codes, vec!["S-Red", "S-Blue", "M-Red", "M-Blue"]);

        for combo in &detail.combinations {
            assert_eq!(combo.stock, 0);
            assert_eq!(combo.options.len(), 2);
            assert_eq!(combo.options[0].variant, "Size");
            assert_eq!(combo.options[1].variant, "Color");
        }
        assert_eq!(
            detail.combination("M-Blue").unwrap().options[0].option,
            "M"
        );
    }

    #[tokio::test]
    async fn test_link_rows_one_per_variant_per_combination() {
        let db = setup().await;
        let id = db.products().create(&tshirt()).await.unwrap();

        let links: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM product_variant_combination_options l
            INNER JOIN product_variant_combinations c ON c.id = l.combination_id
            WHERE c.product_id = ?1
            "#,
        )
        .bind(&id)
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(links, 4 * 2);
    }

    #[tokio::test]
    async fn test_get_unknown_returns_none() {
        let db = setup().await;
        let missing = Uuid::new_v4().to_string();
        assert!(db.products().get_by_id(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let db = setup().await;
        let id = db.products().create(&tshirt()).await.unwrap();

        let first = db.products().get_by_id(&id).await.unwrap();
        let second = db.products().get_by_id(&id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_rows() {
        let db = setup().await;

        // Duplicate option names bypass validation here and hit the
        // UNIQUE (variant_id, name) constraint half-way through the insert.
        let bad = NewProduct {
            variants: vec![
                NewVariant::new("Size", ["S", "M"]),
                NewVariant::new("Color", ["Red", "Red"]),
            ],
            ..tshirt()
        };

        let err = db.products().create(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        for table in [
            "products",
            "variants",
            "variant_options",
            "product_variant_combinations",
            "product_variant_combination_options",
        ] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "{} should be empty after rollback", table);
        }
    }

    #[tokio::test]
    async fn test_failed_join_fetch_is_an_error_not_an_empty_aggregate() {
        let db = setup().await;
        let id = db.products().create(&tshirt()).await.unwrap();

        sqlx::query("DROP TABLE product_variant_combination_options")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.products().get_by_id(&id).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)), "got {:?}", err);

        let err = db.products().list(1, 20).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let db = setup().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            let product = NewProduct {
                code: format!("P{}", i),
                name: format!("Product {}", i),
                created_by: "admin".to_string(),
                variants: vec![NewVariant::new("Size", ["S", "L"])],
            };
            ids.push(db.products().create(&product).await.unwrap());
        }

        let first = db.products().list(1, 2).await.unwrap();
        let second = db.products().list(2, 2).await.unwrap();
        let third = db.products().list(3, 2).await.unwrap();
        let beyond = db.products().list(4, 2).await.unwrap();

        let listed: Vec<String> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .map(|d| d.id.clone())
            .collect();
        let expected: Vec<String> = ids.iter().rev().cloned().collect();
        assert_eq!(listed, expected);
        assert!(beyond.is_empty());

        // Batched joins still attach each product's own rows.
        for detail in first.iter().chain(&second).chain(&third) {
            assert_eq!(detail.variants.len(), 1);
            assert_eq!(detail.combinations.len(), 2);
        }

        assert_eq!(db.products().count().await.unwrap(), 5);
    }
}
