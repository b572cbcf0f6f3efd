//! # Combination Generator
//!
//! Computes every variant combination of a product (the cartesian product
//! of its variants' options).
//!
//! ## Accumulation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Size: [S, M]        Color: [Red, Blue]                                 │
//! │                                                                         │
//! │  start        [ [] ]                                                    │
//! │  + Size       [ [S], [M] ]                                              │
//! │  + Color      [ [S,Red], [S,Blue], [M,Red], [M,Blue] ]                  │
//! │                                                                         │
//! │  codes        S-Red   S-Blue   M-Red   M-Blue                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first dimension varies slowest. A dimension's input position is its
//! column in every output selection and in every combination code.

use crate::error::{CoreError, CoreResult};
use crate::COMBINATION_CODE_DELIMITER;

/// Returns the cartesian product of `dimensions`, in input order.
///
/// Zero dimensions yield one empty selection; any empty dimension yields
/// no selections at all.
pub fn cartesian_product<T: Clone>(dimensions: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut selections: Vec<Vec<T>> = vec![Vec::new()];

    for dimension in dimensions {
        let mut next = Vec::with_capacity(selections.len() * dimension.len());
        for partial in &selections {
            for item in dimension {
                let mut extended = Vec::with_capacity(partial.len() + 1);
                extended.extend_from_slice(partial);
                extended.push(item.clone());
                next.push(extended);
            }
        }
        selections = next;
    }

    selections
}

/// Number of combinations `c1 × c2 × ... × cN`, or `None` on overflow.
pub fn combination_count<I>(option_counts: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    option_counts
        .into_iter()
        .try_fold(1usize, |acc, count| acc.checked_mul(count))
}

/// Rejects matrices whose combination count exceeds `max`.
///
/// Returns the count when it is within bounds.
pub fn ensure_within_limit<I>(option_counts: I, max: usize) -> CoreResult<usize>
where
    I: IntoIterator<Item = usize>,
{
    match combination_count(option_counts) {
        Some(count) if count <= max => Ok(count),
        Some(count) => Err(CoreError::TooManyCombinations { count, max }),
        None => Err(CoreError::TooManyCombinations {
            count: usize::MAX,
            max,
        }),
    }
}

/// Joins option names into a combination code, e.g. `S-Red`.
pub fn combination_code<S: AsRef<str>>(option_names: &[S]) -> String {
    let mut code = String::new();
    for (i, name) in option_names.iter().enumerate() {
        if i > 0 {
            code.push(COMBINATION_CODE_DELIMITER);
        }
        code.push_str(name.as_ref());
    }
    code
}

// =============================================================================
// Planning
// =============================================================================

/// An option with the id it was (or will be) persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRef {
    pub id: String,
    pub name: String,
}

/// A variant dimension with its persisted id and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub variant_id: String,
    pub options: Vec<OptionRef>,
}

/// A combination ready to be inserted: its code plus one
/// `(variant_id, option_id)` link per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCombination {
    pub code: String,
    pub links: Vec<(String, String)>,
}

/// Expands dimensions into the combinations to persist, in generation order.
pub fn plan_combinations(dimensions: &[Dimension]) -> Vec<PlannedCombination> {
    let option_lists: Vec<Vec<OptionRef>> =
        dimensions.iter().map(|d| d.options.clone()).collect();

    cartesian_product(&option_lists)
        .into_iter()
        .map(|selection| {
            let names: Vec<&str> = selection.iter().map(|o| o.name.as_str()).collect();
            let links = dimensions
                .iter()
                .zip(&selection)
                .map(|(dim, opt)| (dim.variant_id.clone(), opt.id.clone()))
                .collect();
            PlannedCombination {
                code: combination_code(&names),
                links,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
