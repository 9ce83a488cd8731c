//! Compiled-fragment algebra.
//!
//! A [`Fragment`] is the partial result of compiling one AST node: a SQL
//! boolean (or, for `project`, column-bearing) expression plus the joins and
//! bound parameters it requires. Fragments combine via the boolean
//! combinators (`and`/`or`/`not`) without ever re-ordering parameters or
//! duplicating joins.

use std::collections::HashSet;

use cmq_core::Param;

/// Partial compiled output produced by most operator compilers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// A SQL boolean expression usable directly after `WHERE` (or, for
    /// `project`'s output, a column-bearing `SELECT ...` subexpression).
    /// Never empty.
    pub where_sql: String,
    /// Join tags this fragment requires, in first-appearance order with
    /// duplicates removed.
    pub joins: Vec<String>,
    /// Bound parameters, in the order their `?` placeholders appear in
    /// `where_sql`.
    pub params: Vec<Param>,
}

impl Fragment {
    /// A fragment with no joins and no parameters.
    #[must_use]
    pub fn leaf(where_sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            where_sql: where_sql.into(),
            joins: Vec::new(),
            params,
        }
    }

    /// A fragment with no parameters but one required join.
    #[must_use]
    pub fn with_join(where_sql: impl Into<String>, join: impl Into<String>) -> Self {
        Self {
            where_sql: where_sql.into(),
            joins: vec![join.into()],
            params: Vec::new(),
        }
    }
}

/// Order-preserving union of several fragments' join lists, with duplicates
/// removed on first appearance — used by `and`/`or`/`not`.
#[must_use]
pub fn union_joins<'a>(joins: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in joins {
        for tag in list {
            if seen.insert(tag.clone()) {
                out.push(tag.clone());
            }
        }
    }
    out
}

/// The two shapes a compiled term can take.
///
/// Every operator except `select-resources`/`select-facts` produces a
/// [`Fragment`]. Those two subquery primitives produce a fully finalized,
/// independent `SELECT` instead — encoding that as a distinct variant lets
/// `project` (the only operator allowed to consume one) enforce the
/// distinction by pattern matching rather than by a runtime flag.
#[derive(Debug, Clone, PartialEq)]
pub enum TermResult {
    Fragment(Fragment),
    Select(FinalizedSelect),
}

impl TermResult {
    /// Expect a [`Fragment`]; used by every operator compiler except
    /// `project`.
    pub fn into_fragment(self, context: &str) -> Result<Fragment, String> {
        match self {
            TermResult::Fragment(f) => Ok(f),
            TermResult::Select(_) => Err(format!(
                "{context} expected a boolean expression but found a bare select"
            )),
        }
    }

    /// Expect a [`FinalizedSelect`]; used only by `project`.
    pub fn into_select(self, context: &str) -> Result<FinalizedSelect, String> {
        match self {
            TermResult::Select(s) => Ok(s),
            TermResult::Fragment(_) => Err(format!(
                "{context} expected a select-resources/select-facts term"
            )),
        }
    }
}

/// A fully-formed, independent `SELECT` statement produced by
/// `select-resources`/`select-facts`.
///
/// Distinct from the top-level finalizer's return tuple only in name: both
/// carry a complete SQL string and its bound parameters, but this type
/// exists purely as the payload of [`TermResult::Select`] so `project` can
/// embed it as a subquery.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSelect {
    pub sql: String,
    pub params: Vec<Param>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_joins_dedups_preserving_first_appearance() {
        let a = vec!["certnames".to_string(), "widgets".to_string()];
        let b = vec!["widgets".to_string(), "certnames".to_string()];
        let merged = union_joins([a.as_slice(), b.as_slice()]);
        assert_eq!(merged, vec!["certnames".to_string(), "widgets".to_string()]);
    }

    #[test]
    fn term_result_rejects_mismatched_shape() {
        let select = TermResult::Select(FinalizedSelect {
            sql: "SELECT 1".to_string(),
            params: vec![],
        });
        assert!(select.clone().into_fragment("and").is_err());
        assert!(select.into_select("project").is_ok());

        let frag = TermResult::Fragment(Fragment::leaf("1 = 1", vec![]));
        assert!(frag.clone().into_select("project").is_err());
        assert!(frag.into_fragment("and").is_ok());
    }
}
