//! # cmq-compile
//!
//! Dialect tables, the recursive term compiler, every operator compiler, and
//! the join assembler/query finalizer that together turn a [`cmq_ast::Term`]
//! into parameterized SQL.
//!
//! The public surface is two entry points, one per dataset kind:
//! [`resource_query_to_sql`] and [`fact_query_to_sql`]. Everything else
//! (dialect tables, the term compiler, individual operator compilers) is
//! exposed for host crates that want to compose or test pieces directly,
//! but the two finalizer functions are the intended integration point.

mod combinators;
mod errors;
mod fact;
mod finalizer;
mod resource;
mod subquery;
pub mod table;
pub mod term;
mod value;

#[cfg(test)]
pub(crate) mod test_support;

use cmq_ast::Term;
use cmq_core::{DatasetKind, DbPrimitives, Dialect, Param, Result};

pub use table::{fact_v2_table, resource_v1_table, resource_v2_table, CompileFn, DialectTable, OperatorEntry};
pub use term::compile_term;

fn table_for(dialect: Dialect) -> &'static DialectTable {
    match dialect {
        Dialect::ResourceV1 => table::resource_v1_table(),
        Dialect::ResourceV2 => table::resource_v2_table(),
        Dialect::FactV2 => table::fact_v2_table(),
    }
}

/// Cap a query's `Debug`-style rendering before it reaches a log line, per
/// §4.13: a deeply nested query must not produce an unbounded log record.
const RENDERED_QUERY_LOG_CAP: usize = 200;

fn truncated_render(query: &Term) -> String {
    let rendered = query.render();
    if rendered.len() <= RENDERED_QUERY_LOG_CAP {
        rendered
    } else {
        let mut truncated = rendered
            .char_indices()
            .take_while(|(i, _)| *i < RENDERED_QUERY_LOG_CAP)
            .map(|(_, c)| c)
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Compile a resource query under `dialect` (`ResourceV1` or `ResourceV2`)
/// into a parameterized SQL statement.
///
/// `db` supplies the dialect-of-the-underlying-database primitives (regex,
/// numeric cast, serialization) this crate never hardcodes; see
/// [`DbPrimitives`].
#[tracing::instrument(level = "debug", skip(db, query), fields(dialect = %dialect))]
pub fn resource_query_to_sql(
    db: &dyn DbPrimitives,
    dialect: Dialect,
    query: &Term,
) -> Result<(String, Vec<Param>)> {
    let outcome = finalizer::finalize(db, table_for(dialect), DatasetKind::Resource, query);
    if let Err(ref err) = outcome {
        tracing::debug!(%err, query = %truncated_render(query), "resource query failed to compile");
    }
    outcome
}

/// Compile a fact query under `dialect` (`FactV2`) into a parameterized SQL
/// statement.
#[tracing::instrument(level = "debug", skip(db, query), fields(dialect = %dialect))]
pub fn fact_query_to_sql(
    db: &dyn DbPrimitives,
    dialect: Dialect,
    query: &Term,
) -> Result<(String, Vec<Param>)> {
    let outcome = finalizer::finalize(db, table_for(dialect), DatasetKind::Fact, query);
    if let Err(ref err) = outcome {
        tracing::debug!(%err, query = %truncated_render(query), "fact query failed to compile");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stub_primitives;
    use cmq_ast::Term;
    use cmq_core::{Param, QueryError};

    fn s(v: &str) -> Term {
        Term::String(v.to_string())
    }
    fn list(items: Vec<Term>) -> Term {
        Term::List(items)
    }

    #[test]
    fn end_to_end_resource_v2_equality() {
        let db = stub_primitives();
        let query = list(vec![s("="), s("type"), s("Class")]);
        let (sql, params) = resource_query_to_sql(&db, Dialect::ResourceV2, &query).unwrap();
        assert_eq!(
            sql,
            "SELECT certname, catalog, resource, type, title, tags, exported, sourcefile, sourceline FROM catalog_resources JOIN certname_catalogs USING(catalog)  WHERE catalog_resources.type = ?"
        );
        assert_eq!(params, vec![Param::Text("Class".to_string())]);
    }

    #[test]
    fn end_to_end_fact_v2_equality() {
        let db = stub_primitives();
        let query = list(vec![s("="), s("name"), s("ipaddress")]);
        let (sql, params) = fact_query_to_sql(&db, Dialect::FactV2, &query).unwrap();
        assert_eq!(
            sql,
            "SELECT certname_facts.certname, certname_facts.name, certname_facts.value FROM certname_facts  WHERE certname_facts.name = ?"
        );
        assert_eq!(params, vec![Param::Text("ipaddress".to_string())]);
    }

    #[test]
    fn end_to_end_fact_numeric_inequality() {
        let db = stub_primitives();
        let query = list(vec![s(">"), s("value"), s("0.3")]);
        let (sql, params) = fact_query_to_sql(&db, Dialect::FactV2, &query).unwrap();
        assert_eq!(
            sql,
            "SELECT certname_facts.certname, certname_facts.name, certname_facts.value FROM certname_facts  WHERE CAST(certname_facts.value AS FLOAT) > ?"
        );
        assert_eq!(params, vec![Param::Float(0.3)]);
    }

    #[test]
    fn subquery_semi_join_end_to_end() {
        let db = stub_primitives();
        let inner = list(vec![
            s("and"),
            list(vec![s("="), s("type"), s("Class")]),
            list(vec![s("="), s("title"), s("apache")]),
        ]);
        let select = list(vec![s("select-resources"), inner]);
        let project = list(vec![s("project"), s("certname"), select]);
        let in_result = list(vec![s("in-result"), s("certname"), project]);
        let query = list(vec![
            s("and"),
            list(vec![s("="), s("name"), s("ipaddress")]),
            in_result,
        ]);
        let (sql, params) = fact_query_to_sql(&db, Dialect::FactV2, &query).unwrap();
        assert!(sql.contains("certname IN (SELECT r1.certname FROM (SELECT"));
        assert_eq!(
            params,
            vec![
                Param::Text("ipaddress".to_string()),
                Param::Text("Class".to_string()),
                Param::Text("apache".to_string()),
            ]
        );
    }

    #[test]
    fn resource_v1_rejects_bare_certname_and_rewrites_node_name() {
        let db = stub_primitives();
        let bad = list(vec![s("="), s("certname"), s("x")]);
        let err = resource_query_to_sql(&db, Dialect::ResourceV1, &bad).unwrap_err();
        assert!(matches!(err, QueryError::UnqueryableField { .. }));

        let good = list(vec![s("="), list(vec![s("node"), s("name")]), s("x")]);
        let (sql, params) = resource_query_to_sql(&db, Dialect::ResourceV1, &good).unwrap();
        assert!(sql.contains("certname_catalogs.certname = ?"));
        assert_eq!(params, vec![Param::Text("x".to_string())]);
    }

    #[test]
    fn resource_v1_rejects_subquery_operators() {
        let db = stub_primitives();
        let query = list(vec![
            s("project"),
            s("certname"),
            list(vec![
                s("select-resources"),
                list(vec![s("="), s("type"), s("Class")]),
            ]),
        ]);
        let err = resource_query_to_sql(&db, Dialect::ResourceV1, &query).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedInDialect { .. }));
    }

    #[test]
    fn truncated_render_caps_long_queries() {
        let mut terms = vec![s("or")];
        for i in 0..50 {
            terms.push(list(vec![s("="), s("title"), s(&format!("value-{i}"))]));
        }
        let query = list(terms);
        let rendered = truncated_render(&query);
        assert!(rendered.len() <= RENDERED_QUERY_LOG_CAP + 3);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn truncated_render_leaves_short_queries_untouched() {
        let query = list(vec![s("="), s("type"), s("Class")]);
        assert_eq!(truncated_render(&query), query.render());
    }

    #[test]
    fn operator_names_compile_identically_under_any_casing() {
        let db = stub_primitives();
        let lower = list(vec![s("and"), list(vec![s("="), s("type"), s("Class")])]);
        let upper = list(vec![s("AND"), list(vec![s("="), s("type"), s("Class")])]);
        let a = resource_query_to_sql(&db, Dialect::ResourceV2, &lower).unwrap();
        let b = resource_query_to_sql(&db, Dialect::ResourceV2, &upper).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn and_of_one_term_matches_bare_term_up_to_parens() {
        let db = stub_primitives();
        let bare = list(vec![s("="), s("type"), s("Class")]);
        let wrapped = list(vec![s("and"), bare.clone()]);
        let (sql_bare, params_bare) = resource_query_to_sql(&db, Dialect::ResourceV2, &bare).unwrap();
        let (sql_wrapped, params_wrapped) =
            resource_query_to_sql(&db, Dialect::ResourceV2, &wrapped).unwrap();
        assert_eq!(params_bare, params_wrapped);
        let (_, where_bare) = sql_bare.split_once("WHERE ").unwrap();
        let (_, where_wrapped) = sql_wrapped.split_once("WHERE ").unwrap();
        assert_eq!(where_wrapped, format!("({where_bare})"));
    }
}
