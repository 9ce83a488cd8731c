//! Fact leaf predicates: equality, regexp, and numeric inequality (§4.6–§4.8).
//! Fact-v2 is the only dialect carrying this dataset, so there is no v1
//! split here the way there is for resources.

use cmq_ast::{Fragment, Path, Term, TermResult};
use cmq_core::{DbPrimitives, QueryError, Result};

use crate::errors::{require_two, unqueryable_field};
use crate::table::DialectTable;
use crate::value::{term_to_param, term_to_scalar};

const FACT_FIELDS: &[&str] = &["certname", "name", "value"];

/// `(= path value)` on facts: `name`, `value`, `certname`, `["node","active"]`.
pub fn compile_fact_eq(
    _table: &'static DialectTable,
    args: &[Term],
    _db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, value_term) = require_two("=", args)?;
    match path_term.as_path() {
        Some(Path::Bare("name")) => Ok(TermResult::Fragment(Fragment::leaf(
            "certname_facts.name = ?",
            vec![term_to_param(value_term)],
        ))),
        Some(Path::Bare("value")) => {
            let text = term_to_scalar(value_term).stringify();
            Ok(TermResult::Fragment(Fragment::leaf(
                "certname_facts.value = ?",
                vec![term_to_param(&Term::String(text))],
            )))
        }
        Some(Path::Bare("certname")) => Ok(TermResult::Fragment(Fragment::leaf(
            "certname_facts.certname = ?",
            vec![term_to_param(value_term)],
        ))),
        Some(Path::Namespaced("node", "active")) => {
            let truthy = term_to_scalar(value_term).is_truthy();
            let where_sql = if truthy {
                "certnames.deactivated IS NULL"
            } else {
                "certnames.deactivated IS NOT NULL"
            };
            Ok(TermResult::Fragment(Fragment::with_join(
                where_sql,
                "certnames",
            )))
        }
        _ => Err(unqueryable_field(
            &path_term.render(),
            " for facts",
            FACT_FIELDS,
        )),
    }
}

/// `(~ path pattern)` on facts: `certname`, `name`, `value` only.
pub fn compile_fact_regex(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, pattern_term) = require_two("~", args)?;
    let column = match path_term.as_path() {
        Some(Path::Bare("certname")) => "certname_facts.certname",
        Some(Path::Bare("name")) => "certname_facts.name",
        Some(Path::Bare("value")) => "certname_facts.value",
        _ => {
            return Err(unqueryable_field(
                &path_term.render(),
                " for facts",
                FACT_FIELDS,
            ))
        }
    };
    let where_sql = db.regex_match(column);
    Ok(TermResult::Fragment(Fragment::leaf(
        where_sql,
        vec![term_to_param(pattern_term)],
    )))
}

fn compile_fact_ineq(
    op: &str,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, value_term) = require_two(op, args)?;
    match path_term.as_path() {
        Some(Path::Bare("value")) => {}
        _ => {
            return Err(unqueryable_field(
                &path_term.render(),
                &format!(" for {op} comparisons on facts"),
                &["value"],
            ))
        }
    }
    let text = term_to_scalar(value_term).stringify();
    let Some(number) = db.parse_number(&text) else {
        return Err(QueryError::TypeError {
            value: text,
            operator: op.to_string(),
        });
    };
    let where_sql = format!("{} {op} ?", db.numeric_cast("certname_facts.value"));
    Ok(TermResult::Fragment(Fragment::leaf(
        where_sql,
        vec![cmq_core::Param::Float(number)],
    )))
}

pub fn compile_fact_gt(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    compile_fact_ineq(">", args, db)
}

pub fn compile_fact_lt(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    compile_fact_ineq("<", args, db)
}

pub fn compile_fact_gte(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    compile_fact_ineq(">=", args, db)
}

pub fn compile_fact_lte(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    compile_fact_ineq("<=", args, db)
}
