//! # Product Aggregate Builder
//!
//! Folds normalized join rows into [`ProductDetail`] read models.
//!
//! ## Folding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  variant/option rows                combination/link rows               │
//! │  ────────────────────               ──────────────────────────────      │
//! │  p1 Size  S                         p1 c1 S-Red  4 Size  S              │
//! │  p1 Size  M                         p1 c1 S-Red  4 Color Red            │
//! │  p1 Color Red                       p1 c2 M-Red  0 Size  M              │
//! │                                     p1 c2 M-Red  0 Color Red            │
//! │       │ group by (product, variant)        │ group by (product, combo)  │
//! │       ▼                                    ▼                            │
//! │  Size:[S,M] Color:[Red]             c1 S-Red 4 [Size=S, Color=Red]      │
//! │                                     c2 M-Red 0 [Size=M, Color=Red]      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are expected in display order (the repository orders by the stored
//! positions); first appearance decides group order here.

use std::collections::HashMap;

use crate::types::{
    CombinationDetail, CombinationOptionRow, OptionSelection, Product, ProductDetail,
    VariantGroup, VariantOptionRow,
};

/// Builds one detail per product, preserving the order of `products`.
///
/// Rows belonging to product ids not present in `products` are ignored.
pub fn build_details(
    products: &[Product],
    variant_rows: Vec<VariantOptionRow>,
    combination_rows: Vec<CombinationOptionRow>,
) -> Vec<ProductDetail> {
    let mut details: Vec<ProductDetail> = products.iter().map(ProductDetail::from_product).collect();
    let index: HashMap<String, usize> = details
        .iter()
        .enumerate()
        .map(|(i, d)| (d.id.clone(), i))
        .collect();

    for row in variant_rows {
        let Some(&slot) = index.get(&row.product_id) else {
            continue;
        };
        push_variant_option(&mut details[slot].variants, row.variant_name, row.option_name);
    }

    // Position of each (product, combination) inside its product's list.
    let mut combo_slots: HashMap<String, (usize, usize)> = HashMap::new();
    for row in combination_rows {
        let Some(&slot) = index.get(&row.product_id) else {
            continue;
        };
        let selection = OptionSelection {
            variant: row.variant_name,
            option: row.option_name,
        };

        match combo_slots.get(&row.combination_id).copied() {
            Some((p, c)) => details[p].combinations[c].options.push(selection),
            None => {
                let combos = &mut details[slot].combinations;
                combo_slots.insert(row.combination_id.clone(), (slot, combos.len()));
                combos.push(CombinationDetail {
                    id: row.combination_id,
                    combination_code: row.combination_code,
                    stock: row.stock,
                    options: vec![selection],
                });
            }
        }
    }

    details
}

/// Builds the detail of a single product.
pub fn build_detail(
    product: &Product,
    variant_rows: Vec<VariantOptionRow>,
    combination_rows: Vec<CombinationOptionRow>,
) -> ProductDetail {
    build_details(std::slice::from_ref(product), variant_rows, combination_rows)
        .pop()
        .unwrap_or_else(|| ProductDetail::from_product(product))
}

fn push_variant_option(groups: &mut Vec<VariantGroup>, variant: String, option: String) {
    match groups.iter_mut().find(|g| g.name == variant) {
        Some(group) => group.options.push(option),
        None => groups.push(VariantGroup {
            name: variant,
            options: vec![option],
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, total: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            code: format!("{}-CODE", id),
            name: format!("Product {}", id),
            created_by: "user-1".to_string(),
            created_at: now,
            updated_at: now,
            total_stock: total,
        }
    }

    fn vrow(product_id: &str, variant: &str, option: &str) -> VariantOptionRow {
        VariantOptionRow {
            product_id: product_id.to_string(),
            variant_name: variant.to_string(),
            option_name: option.to_string(),
        }
    }

    fn crow(
        product_id: &str,
        combo: &str,
        code: &str,
        stock: i64,
        variant: &str,
        option: &str,
    ) -> CombinationOptionRow {
        CombinationOptionRow {
            product_id: product_id.to_string(),
            combination_id: combo.to_string(),
            combination_code: code.to_string(),
            stock,
            variant_name: variant.to_string(),
            option_name: option.to_string(),
        }
    }

    #[test]
    fn test_single_product_folding() {
        let p = product("p1", 4);
        let detail = build_detail(
            &p,
            vec![
                vrow("p1", "Size", "S"),
                vrow("p1", "Size", "M"),
                vrow("p1", "Color", "Red"),
            ],
            vec![
                crow("p1", "c1", "S-Red", 4, "Size", "S"),
                crow("p1", "c1", "S-Red", 4, "Color", "Red"),
                crow("p1", "c2", "M-Red", 0, "Size", "M"),
                crow("p1", "c2", "M-Red", 0, "Color", "Red"),
            ],
        );

        assert_eq!(detail.variants.len(), 2);
        assert_eq!(detail.variants[0].name, "Size");
        assert_eq!(detail.variants[0].options, vec!["S", "M"]);
        assert_eq!(detail.variants[1].options, vec!["Red"]);

        assert_eq!(detail.combinations.len(), 2);
        let first = &detail.combinations[0];
        assert_eq!(first.combination_code, "S-Red");
        assert_eq!(first.stock, 4);
        assert_eq!(
            first.options,
            vec![
                OptionSelection {
                    variant: "Size".into(),
                    option: "S".into(),
                },
                OptionSelection {
                    variant: "Color".into(),
                    option: "Red".into(),
                },
            ]
        );
        assert_eq!(detail.combination_stock_sum(), detail.total_stock);
    }

    #[test]
    fn test_batch_keeps_page_order_and_separates_products() {
        let products = vec![product("p2", 0), product("p1", 0)];
        let details = build_details(
            &products,
            vec![vrow("p1", "Size", "S"), vrow("p2", "Flavor", "Mint")],
            vec![
                crow("p1", "c1", "S", 0, "Size", "S"),
                crow("p2", "c9", "Mint", 0, "Flavor", "Mint"),
            ],
        );

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].id, "p2");
        assert_eq!(details[0].variants[0].name, "Flavor");
        assert_eq!(details[0].combinations[0].id, "c9");
        assert_eq!(details[1].id, "p1");
        assert_eq!(details[1].combinations[0].combination_code, "S");
    }

    #[test]
    fn test_unknown_product_rows_ignored() {
        let p = product("p1", 0);
        let detail = build_detail(
            &p,
            vec![vrow("other", "Size", "S")],
            vec![crow("other", "c1", "S", 0, "Size", "S")],
        );

        assert!(detail.variants.is_empty());
        assert!(detail.combinations.is_empty());
    }

    #[test]
    fn test_no_rows_gives_bare_detail() {
        let p = product("p1", 0);
        let detail = build_detail(&p, Vec::new(), Vec::new());
        assert_eq!(detail.id, "p1");
        assert_eq!(detail.code, "p1-CODE");
    }
}
