//! Join assembler and query finalizer (§4.11).
//!
//! The only place in the crate that emits `SELECT`/`FROM`. Used both by the
//! public entry points and, recursively, by `select-resources`/
//! `select-facts` to produce the nested `SELECT` a `project` wraps.

use cmq_ast::Term;
use cmq_core::{DatasetKind, DbPrimitives, Param, QueryError, Result};

use crate::table::DialectTable;
use crate::term::compile_term;

/// Selectable resource columns, in the stable order the finalizer always
/// emits them in (§8, scenario 2: "column order is implementation-defined
/// but must be stable").
const RESOURCE_COLUMNS: &[&str] = &[
    "certname",
    "catalog",
    "resource",
    "type",
    "title",
    "tags",
    "exported",
    "sourcefile",
    "sourceline",
];

/// Resolve a join tag to its SQL fragment for a given dataset kind.
fn join_tables(kind: DatasetKind, tag: &str) -> Option<&'static str> {
    match (kind, tag) {
        (DatasetKind::Resource, "certnames") => {
            Some("INNER JOIN certnames ON certname_catalogs.certname = certnames.name")
        }
        (DatasetKind::Fact, "certnames") => {
            Some("INNER JOIN certnames ON certname_facts.certname = certnames.name")
        }
        _ => None,
    }
}

/// Compile `query` under `table` and emit the final `SELECT` for `kind`.
///
/// A bare `select-*` as the query root is a [`QueryError::MalformedQuery`]:
/// the finalizer only ever accepts a boolean-expression fragment at the top
/// level, never an already-finalized select.
pub fn finalize(
    db: &dyn DbPrimitives,
    table: &'static DialectTable,
    kind: DatasetKind,
    query: &Term,
) -> Result<(String, Vec<Param>)> {
    let result = compile_term(table, query, db)?;
    let fragment = result
        .into_fragment("query root")
        .map_err(QueryError::MalformedQuery)?;

    let joins: Vec<&'static str> = fragment
        .joins
        .iter()
        .map(|tag| {
            join_tables(kind, tag).unwrap_or_else(|| {
                panic!("compiler emitted unrecognized join tag '{tag}' for {kind} dataset")
            })
        })
        .collect();
    let join_clause = joins.join(" ");

    let sql = match kind {
        DatasetKind::Resource => format!(
            "SELECT {columns} FROM catalog_resources JOIN certname_catalogs USING(catalog) {join_clause} WHERE {where_sql}",
            columns = RESOURCE_COLUMNS.join(", "),
            where_sql = fragment.where_sql,
        ),
        DatasetKind::Fact => format!(
            "SELECT certname_facts.certname, certname_facts.name, certname_facts.value FROM certname_facts {join_clause} WHERE {where_sql}",
            where_sql = fragment.where_sql,
        ),
    };

    Ok((sql, fragment.params))
}
