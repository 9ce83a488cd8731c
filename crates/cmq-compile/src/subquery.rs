//! Subquery primitives: `select-resources`, `select-facts`, `project`,
//! `in-result` (§4.9). Together these express cross-dataset semi-joins:
//! `in-result → project → select-*`.
//!
//! `select-resources`/`select-facts` always finalize against the v2 tables
//! for their own dataset, regardless of which dialect table the *outer*
//! query is compiling under — this is the one place a resource-v2 query can
//! embed a fact subquery and vice versa (§4.10).

use cmq_ast::{Fragment, FinalizedSelect, Term, TermResult};
use cmq_core::{DatasetKind, DbPrimitives, QueryError, Result};

use crate::errors::{require_one, require_two, unqueryable_field};
use crate::finalizer::finalize;
use crate::table::{fact_v2_table, resource_v2_table, DialectTable};
use crate::term::compile_term;

/// `(select-resources query)` — finalizes `query` against resource-v2 and
/// hands back the result as a [`TermResult::Select`], never a `Fragment`.
pub fn compile_select_resources(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let inner = require_one("select-resources", args)?;
    let (sql, params) = finalize(db, resource_v2_table(), DatasetKind::Resource, inner)?;
    Ok(TermResult::Select(FinalizedSelect { sql, params }))
}

/// `(select-facts query)` — finalizes `query` against fact-v2.
pub fn compile_select_facts(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let inner = require_one("select-facts", args)?;
    let (sql, params) = finalize(db, fact_v2_table(), DatasetKind::Fact, inner)?;
    Ok(TermResult::Select(FinalizedSelect { sql, params }))
}

fn select_dataset_kind(op: &str) -> Option<DatasetKind> {
    match op {
        "select-resources" => Some(DatasetKind::Resource),
        "select-facts" => Some(DatasetKind::Fact),
        _ => None,
    }
}

/// `(project field subquery)` — `subquery` must be headed by
/// `select-resources`/`select-facts`; produces a column-bearing fragment,
/// not a boolean one.
pub fn compile_project(
    table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (field_term, subquery_term) = require_two("project", args)?;
    let field = field_term.as_str().ok_or_else(|| {
        QueryError::MalformedQuery(format!(
            "project's field must be a bare string, found {}",
            field_term.render()
        ))
    })?;

    let Some((op, _)) = subquery_term.as_application() else {
        return Err(QueryError::BadSubquery(
            "argument to project must be a select operator".to_string(),
        ));
    };
    let Some(kind) = select_dataset_kind(&op.to_ascii_lowercase()) else {
        return Err(QueryError::BadSubquery(
            "argument to project must be a select operator".to_string(),
        ));
    };

    if !kind.selectable_columns().contains(&field) {
        return Err(unqueryable_field(
            field,
            &format!(" for {kind}"),
            kind.selectable_columns(),
        ));
    }

    let result = compile_term(table, subquery_term, db)?;
    let select = result
        .into_select("project")
        .map_err(QueryError::BadSubquery)?;

    Ok(TermResult::Fragment(Fragment {
        where_sql: format!("SELECT r1.{field} FROM ({}) r1", select.sql),
        joins: Vec::new(),
        params: select.params,
    }))
}

/// Shared implementation for `in-result`; `kind` is fixed by which dialect
/// table's entry binds to `in_result_resource` vs. `in_result_fact`.
fn in_result(
    kind: DatasetKind,
    table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (field_term, subquery_term) = require_two("in-result", args)?;
    let field = field_term.as_str().ok_or_else(|| {
        QueryError::MalformedQuery(format!(
            "in-result's field must be a bare string, found {}",
            field_term.render()
        ))
    })?;

    if !kind.selectable_columns().contains(&field) {
        return Err(unqueryable_field(
            field,
            &format!(" for {kind}"),
            kind.selectable_columns(),
        ));
    }

    let Some((op, _)) = subquery_term.as_application() else {
        return Err(QueryError::BadSubquery(
            "argument to in-result must be a project operator".to_string(),
        ));
    };
    if op.to_ascii_lowercase() != "project" {
        return Err(QueryError::BadSubquery(
            "argument to in-result must be a project operator".to_string(),
        ));
    }

    let result = compile_term(table, subquery_term, db)?;
    let project = result
        .into_fragment("in-result")
        .map_err(QueryError::MalformedQuery)?;

    Ok(TermResult::Fragment(Fragment {
        where_sql: format!("{field} IN ({})", project.where_sql),
        joins: project.joins,
        params: project.params,
    }))
}

/// `(in-result field subquery)` bound to the resource dataset (resource-v2).
pub fn in_result_resource(
    table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    in_result(DatasetKind::Resource, table, args, db)
}

/// `(in-result field subquery)` bound to the fact dataset (fact-v2).
pub fn in_result_fact(
    table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    in_result(DatasetKind::Fact, table, args, db)
}
