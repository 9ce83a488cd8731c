//! Boolean combinators: `and`, `or`, `not`.
//!
//! All three share one shape: compile every child term against the same
//! dialect table, concatenate params in argument order, and union the
//! joins. `not` is lowered to "or, then wrap in NOT (...)" so it inherits
//! `or`'s De Morgan behavior for free rather than duplicating it.

use cmq_ast::{union_joins, Fragment, Term, TermResult};
use cmq_core::{DbPrimitives, QueryError, Result};

use crate::table::DialectTable;
use crate::term::compile_term;

fn compile_children(
    table: &'static DialectTable,
    op: &str,
    terms: &[Term],
    db: &dyn DbPrimitives,
) -> Result<Vec<Fragment>> {
    if terms.is_empty() {
        return Err(QueryError::MalformedQuery(format!(
            "{op} requires at least one term"
        )));
    }
    terms
        .iter()
        .map(|term| compile_term(table, term, db)?.into_fragment(op).map_err(QueryError::MalformedQuery))
        .collect()
}

fn combine(children: &[Fragment], joiner: &str) -> Fragment {
    let where_sql = children
        .iter()
        .map(|f| format!("({})", f.where_sql))
        .collect::<Vec<_>>()
        .join(joiner);
    let joins = union_joins(children.iter().map(|f| f.joins.as_slice()));
    let params = children.iter().flat_map(|f| f.params.clone()).collect();
    Fragment {
        where_sql,
        joins,
        params,
    }
}

/// `(and t1 t2 ...)` — conjunction of every child's `where`, parenthesized.
pub fn compile_and(
    table: &'static DialectTable,
    terms: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let children = compile_children(table, "and", terms, db)?;
    Ok(TermResult::Fragment(combine(&children, " AND ")))
}

/// `(or t1 t2 ...)` — disjunction of every child's `where`, parenthesized.
pub fn compile_or(
    table: &'static DialectTable,
    terms: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let children = compile_children(table, "or", terms, db)?;
    Ok(TermResult::Fragment(combine(&children, " OR ")))
}

/// `(not t1 t2 ...)` — negation of the equivalent `or`.
pub fn compile_not(
    table: &'static DialectTable,
    terms: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let children = compile_children(table, "not", terms, db)?;
    let disjunction = combine(&children, " OR ");
    Ok(TermResult::Fragment(Fragment {
        where_sql: format!("NOT ({})", disjunction.where_sql),
        joins: disjunction.joins,
        params: disjunction.params,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::resource_v2_table;
    use crate::test_support::stub_primitives;
    use cmq_core::Param;

    fn eq(field: &str, value: &str) -> Term {
        Term::List(vec![
            Term::String("=".to_string()),
            Term::String(field.to_string()),
            Term::String(value.to_string()),
        ])
    }

    #[test]
    fn and_wraps_each_child_in_parens_and_concatenates_params() {
        let db = stub_primitives();
        let table = resource_v2_table();
        let node = Term::List(vec![
            Term::String("and".to_string()),
            eq("type", "Class"),
            eq("title", "apache"),
        ]);
        let result = compile_term(table, &node, &db).unwrap();
        let frag = result.into_fragment("test").unwrap();
        assert_eq!(
            frag.where_sql,
            "(catalog_resources.type = ?) AND (catalog_resources.title = ?)"
        );
        assert_eq!(
            frag.params,
            vec![
                Param::Text("Class".to_string()),
                Param::Text("apache".to_string())
            ]
        );
    }

    #[test]
    fn or_joins_with_or_keyword() {
        let db = stub_primitives();
        let table = resource_v2_table();
        let node = Term::List(vec![
            Term::String("or".to_string()),
            eq("type", "Class"),
            eq("title", "apache"),
        ]);
        let frag = compile_term(table, &node, &db)
            .unwrap()
            .into_fragment("test")
            .unwrap();
        assert_eq!(
            frag.where_sql,
            "(catalog_resources.type = ?) OR (catalog_resources.title = ?)"
        );
    }

    #[test]
    fn not_wraps_or_in_not() {
        let db = stub_primitives();
        let table = resource_v2_table();
        let node = Term::List(vec![Term::String("not".to_string()), eq("type", "Class")]);
        let frag = compile_term(table, &node, &db)
            .unwrap()
            .into_fragment("test")
            .unwrap();
        assert_eq!(frag.where_sql, "NOT ((catalog_resources.type = ?))");
    }

    #[test]
    fn empty_terms_is_malformed() {
        let db = stub_primitives();
        let table = resource_v2_table();
        let node = Term::List(vec![Term::String("and".to_string())]);
        let err = compile_term(table, &node, &db).unwrap_err();
        assert!(matches!(err, QueryError::MalformedQuery(_)));
    }

    #[test]
    fn joins_are_unioned_and_deduplicated() {
        let db = stub_primitives();
        let table = resource_v2_table();
        let active = Term::List(vec![
            Term::String("=".to_string()),
            Term::List(vec![
                Term::String("node".to_string()),
                Term::String("active".to_string()),
            ]),
            Term::Boolean(true),
        ]);
        let node = Term::List(vec![
            Term::String("and".to_string()),
            active.clone(),
            active,
        ]);
        let frag = compile_term(table, &node, &db)
            .unwrap()
            .into_fragment("test")
            .unwrap();
        assert_eq!(frag.joins, vec!["certnames".to_string()]);
    }
}
