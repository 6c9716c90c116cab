//! Column identity resolution between two independently-named schemas.

use std::collections::HashMap;

use crate::model::ColumnMapping;
use crate::similar::jaro_winkler;

/// Default acceptance threshold for the similarity matching mode.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Coarse identity of a column name: trim, uppercase, replace punctuation
/// with spaces, take the first token. "Supplier_Name", "SUPPLIER NAME" and
/// "supplier-name!" all collapse to "SUPPLIER". Degenerate names fall back
/// to the uppercased original; never fails.
pub fn base_identity(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    match cleaned.split_whitespace().next() {
        Some(token) => token.to_string(),
        None => name.to_uppercase(),
    }
}

/// One "before" column per "after" column by base-identity equality.
///
/// Both lists are scanned in declared order and the first "before" match
/// wins, so duplicate base identities resolve deterministically (and
/// order-dependently). Unmatched "after" columns are simply absent.
pub fn resolve_mapping(before_columns: &[String], after_columns: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for after_col in after_columns {
        let after_base = base_identity(after_col);
        for before_col in before_columns {
            if base_identity(before_col) == after_base {
                mapping.insert(after_col.clone(), before_col.clone());
                break;
            }
        }
    }
    mapping
}

/// Every candidate "before" column per "after" column, declared order.
/// Collects ties instead of picking a winner; meant for human review.
pub fn suggest_candidates(
    before_columns: &[String],
    after_columns: &[String],
) -> HashMap<String, Vec<String>> {
    let mut suggestions = HashMap::new();
    for after_col in after_columns {
        let after_base = base_identity(after_col);
        let matches: Vec<String> = before_columns
            .iter()
            .filter(|before_col| base_identity(before_col) == after_base)
            .cloned()
            .collect();
        if !matches.is_empty() {
            suggestions.insert(after_col.clone(), matches);
        }
    }
    suggestions
}

/// Similarity fallback for schemas where base identities don't line up:
/// the best-scoring "after" column per "before" column, at or above
/// `threshold`. Advisory only — caller-supplied overrides take precedence
/// over both automatic strategies.
pub fn similar_mapping(
    before_columns: &[String],
    after_columns: &[String],
    threshold: f64,
) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    for before_col in before_columns {
        let mut best: Option<(&String, f64)> = None;
        for after_col in after_columns {
            let score = jaro_winkler(before_col, after_col);
            if score < threshold {
                continue;
            }
            // Strictly-greater keeps the first declared column on ties.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((after_col, score));
            }
        }
        if let Some((after_col, _)) = best {
            mapping.insert(before_col.clone(), after_col.clone());
        }
    }
    mapping
}
