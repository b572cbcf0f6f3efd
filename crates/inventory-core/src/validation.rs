//! # Validation Module
//!
//! Input validation for the inventory service boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service boundary (THIS MODULE)                               │
//! │  ├── Required fields, lengths, quantities, page bounds                 │
//! │  └── Variant matrix shape (unique names, no delimiter in options)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0)                                     │
//! │  ├── UNIQUE (product_id, combination_code)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventory_core::validation::{validate_quantity, validate_variants};
//! use inventory_core::NewVariant;
//!
//! validate_quantity(5).unwrap();
//! validate_variants(&[NewVariant::new("Size", ["S", "M"])]).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{NewProduct, NewVariant};
use crate::{COMBINATION_CODE_DELIMITER, MAX_PAGE_SIZE, MAX_STOCK_ADJUSTMENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
///
/// ```rust
/// use inventory_core::validation::validate_product_code;
///
/// assert!(validate_product_code("TSHIRT-01").is_ok());
/// assert!(validate_product_code("  ").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    validate_text("code", code, 50)
}

/// Validates a product name (required, at most 200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Validates the variant matrix of a create request.
///
/// ## Rules
/// - At least one variant
/// - Every variant has a name and at least one option
/// - Variant names are unique within the product
/// - Option names are unique within their variant
/// - Option names do not contain the combination-code delimiter, so that
///   distinct selections can never produce the same code
pub fn validate_variants(variants: &[NewVariant]) -> ValidationResult<()> {
    if variants.is_empty() {
        return Err(ValidationError::Required {
            field: "variants".to_string(),
        });
    }

    let mut variant_names = HashSet::new();
    for variant in variants {
        validate_text("variant name", &variant.name, 100)?;
        if !variant_names.insert(variant.name.trim()) {
            return Err(ValidationError::Duplicate {
                field: "variant".to_string(),
                value: variant.name.clone(),
            });
        }

        if variant.options.is_empty() {
            return Err(ValidationError::Required {
                field: format!("options of variant '{}'", variant.name),
            });
        }

        let mut option_names = HashSet::new();
        for option in &variant.options {
            validate_text("option name", option, 100)?;
            if option.contains(COMBINATION_CODE_DELIMITER) {
                return Err(ValidationError::InvalidFormat {
                    field: "option name".to_string(),
                    reason: format!("must not contain '{}'", COMBINATION_CODE_DELIMITER),
                });
            }
            if !option_names.insert(option.trim()) {
                return Err(ValidationError::Duplicate {
                    field: format!("option of variant '{}'", variant.name),
                    value: option.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Validates a whole create request.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_code(&product.code)?;
    validate_product_name(&product.name)?;
    validate_text("created_by", &product.created_by, 100)?;
    validate_variants(&product.variants)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock adjustment quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_STOCK_ADJUSTMENT
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK_ADJUSTMENT {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_STOCK_ADJUSTMENT,
        });
    }

    Ok(())
}

/// Validates pagination input (1-based page, bounded page size).
pub fn validate_page(page: u32, page_size: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }

    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page size".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ```rust
/// use inventory_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
