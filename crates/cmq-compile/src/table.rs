//! Dialect tables: operator name → compiler, one table per dialect.
//!
//! Tables are built once behind a [`OnceLock`] and accessed by reference
//! from then on — they hold no mutable state and are `Send + Sync`, so many
//! compilations can run concurrently against the same table.
//!
//! Cross-dialect references (resource-v2's `select-facts` compiling its
//! sub-AST against the fact-v2 table, and vice versa) are wired by having
//! the relevant operator functions call the *other* table's accessor
//! function directly, rather than by embedding one table inside another.
//! That sidesteps the mutual-recursion-at-construction-time problem
//! entirely: each table's `HashMap` is built independently and lazily, and
//! the only thing that "recurses" is a function call made once compilation
//! is already underway.

use std::collections::HashMap;
use std::sync::OnceLock;

use cmq_ast::{Term, TermResult};
use cmq_core::{DbPrimitives, Dialect, QueryError, Result};

use crate::{combinators, fact, resource, subquery};

/// A single operator's resolution within a dialect: either a compiler
/// function, or an explicit marker that the operator exists in the
/// language but is disallowed in this dialect (distinct from an operator
/// this dialect has simply never heard of).
pub enum OperatorEntry {
    Compiler(CompileFn),
    Unsupported,
}

/// An operator compiler: given the dialect table currently in force (for
/// recursing into subterms with the *same* dialect), the operator's
/// operand list, and the host's database primitives, produce a
/// [`TermResult`].
pub type CompileFn =
    fn(table: &'static DialectTable, args: &[Term], db: &dyn DbPrimitives) -> Result<TermResult>;

/// An operator-to-compiler map for one dialect.
pub struct DialectTable {
    pub dialect: Dialect,
    operators: HashMap<&'static str, OperatorEntry>,
}

impl DialectTable {
    /// Resolve a (already-lowercased) operator name.
    ///
    /// `None` means the operator does not exist in this language at all
    /// (→ `UnknownOperator`); `Some(Unsupported)` means it exists but is
    /// disallowed in this dialect (→ `UnsupportedInDialect`).
    #[must_use]
    pub fn get(&self, operator: &str) -> Option<&OperatorEntry> {
        self.operators.get(operator)
    }

    /// Resolve an operator or fail with the appropriate error, mirroring
    /// the term compiler's own lookup contract so other call sites (e.g.
    /// `select-*`'s inner compile) get identical error behavior.
    pub fn resolve(&self, operator: &str, term: &Term) -> Result<CompileFn> {
        match self.get(operator) {
            None => Err(QueryError::UnknownOperator {
                operator: operator.to_string(),
                term: term.render(),
            }),
            Some(OperatorEntry::Unsupported) => Err(QueryError::UnsupportedInDialect {
                operator: operator.to_string(),
                dialect: self.dialect.to_string(),
            }),
            Some(OperatorEntry::Compiler(f)) => Ok(*f),
        }
    }
}

fn common_combinators() -> [(&'static str, OperatorEntry); 3] {
    [
        ("and", OperatorEntry::Compiler(combinators::compile_and)),
        ("or", OperatorEntry::Compiler(combinators::compile_or)),
        ("not", OperatorEntry::Compiler(combinators::compile_not)),
    ]
}

/// The resource-v1 dialect: equality only (via `["node","name"]`), no
/// regex, no subqueries.
pub fn resource_v1_table() -> &'static DialectTable {
    static TABLE: OnceLock<DialectTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut operators = HashMap::new();
        for (name, entry) in common_combinators() {
            operators.insert(name, entry);
        }
        operators.insert("=", OperatorEntry::Compiler(resource::compile_resource_eq_v1));
        for name in ["project", "in-result", "select-resources", "select-facts", "~"] {
            operators.insert(name, OperatorEntry::Unsupported);
        }
        DialectTable {
            dialect: Dialect::ResourceV1,
            operators,
        }
    })
}

/// The resource-v2 dialect: equality (bare `certname`), regex, and the
/// full subquery vocabulary.
pub fn resource_v2_table() -> &'static DialectTable {
    static TABLE: OnceLock<DialectTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut operators = HashMap::new();
        for (name, entry) in common_combinators() {
            operators.insert(name, entry);
        }
        operators.insert("=", OperatorEntry::Compiler(resource::compile_resource_eq_v2));
        operators.insert("~", OperatorEntry::Compiler(resource::compile_resource_regex));
        operators.insert("project", OperatorEntry::Compiler(subquery::compile_project));
        operators.insert(
            "in-result",
            OperatorEntry::Compiler(subquery::in_result_resource),
        );
        operators.insert(
            "select-resources",
            OperatorEntry::Compiler(subquery::compile_select_resources),
        );
        operators.insert(
            "select-facts",
            OperatorEntry::Compiler(subquery::compile_select_facts),
        );
        DialectTable {
            dialect: Dialect::ResourceV2,
            operators,
        }
    })
}

/// The fact-v2 dialect: equality, regex, numeric inequality, and the
/// subquery vocabulary (with `in-result`'s outer dataset fixed to facts).
pub fn fact_v2_table() -> &'static DialectTable {
    static TABLE: OnceLock<DialectTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut operators = HashMap::new();
        for (name, entry) in common_combinators() {
            operators.insert(name, entry);
        }
        operators.insert("=", OperatorEntry::Compiler(fact::compile_fact_eq));
        operators.insert("~", OperatorEntry::Compiler(fact::compile_fact_regex));
        operators.insert(">", OperatorEntry::Compiler(fact::compile_fact_gt));
        operators.insert("<", OperatorEntry::Compiler(fact::compile_fact_lt));
        operators.insert(">=", OperatorEntry::Compiler(fact::compile_fact_gte));
        operators.insert("<=", OperatorEntry::Compiler(fact::compile_fact_lte));
        operators.insert("project", OperatorEntry::Compiler(subquery::compile_project));
        operators.insert("in-result", OperatorEntry::Compiler(subquery::in_result_fact));
        operators.insert(
            "select-resources",
            OperatorEntry::Compiler(subquery::compile_select_resources),
        );
        operators.insert(
            "select-facts",
            OperatorEntry::Compiler(subquery::compile_select_facts),
        );
        DialectTable {
            dialect: Dialect::FactV2,
            operators,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_marks_subqueries_and_regex_unsupported_not_unknown() {
        let table = resource_v1_table();
        assert!(matches!(table.get("project"), Some(OperatorEntry::Unsupported)));
        assert!(matches!(table.get("~"), Some(OperatorEntry::Unsupported)));
        assert!(table.get("frobnicate").is_none());
    }

    #[test]
    fn v2_and_fact_v2_both_expose_the_full_subquery_vocabulary() {
        for table in [resource_v2_table(), fact_v2_table()] {
            for op in ["and", "or", "not", "project", "in-result", "select-resources", "select-facts"] {
                assert!(
                    matches!(table.get(op), Some(OperatorEntry::Compiler(_))),
                    "{op} missing from {}",
                    table.dialect
                );
            }
        }
    }
}
