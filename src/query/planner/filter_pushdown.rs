// Filter Pushdown
//
// Decides whether a filter sitting directly above a join can be relocated
// below it. Relocation is semantics-preserving for inner joins whenever the
// predicate references columns from exactly one side.

use std::collections::HashSet;

use crate::catalog::Schema;
use crate::query::expression::Expression;

/// Which join input a pushed-down filter lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushdownSide {
    Left,
    Right,
}

/// The set of column names a schema exposes
pub fn column_name_set(schema: &Schema) -> HashSet<String> {
    schema.columns().iter().map(|c| c.name.clone()).collect()
}

/// Decide where a join-topping filter predicate can be pushed. Returns None
/// when the predicate references no columns, or columns from both sides,
/// in which case the filter stays above the join.
pub fn pushdown_side(
    predicate: &Expression,
    left: &Schema,
    right: &Schema,
) -> Option<PushdownSide> {
    let refs = predicate.column_refs();
    if refs.is_empty() {
        return None;
    }
    if refs.is_subset(&column_name_set(left)) {
        return Some(PushdownSide::Left);
    }
    if refs.is_subset(&column_name_set(right)) {
        return Some(PushdownSide::Right);
    }
    None
}
