//! Resource leaf predicates: equality (v1 and v2) and regexp (v2 only).
//!
//! See §4.3–§4.5. v1 and v2 equality share one inner implementation; v1
//! layers a `certname`/`["node","name"]` rewrite on top (§4.4).

use cmq_ast::{Fragment, Path, Term, TermResult};
use cmq_core::{DbPrimitives, Result};

use crate::errors::{require_two, unqueryable_field};
use crate::table::DialectTable;
use crate::value::{term_as_text, term_to_param, term_to_scalar};

/// Bare-string columns accepted by resource equality, per §4.3. `certname`
/// is handled by its own match arm (it behaves differently between v1 and
/// v2) so it is deliberately absent from this list.
const EQ_BARE_FIELDS: &[&str] = &[
    "catalog",
    "exported",
    "resource",
    "sourcefile",
    "sourceline",
    "tags",
    "title",
    "type",
];

/// Bare-string columns accepted by resource regexp, per §4.5. Note `tags`
/// is absent here — array columns go through the `"tag"` path instead; see
/// the open question pinned in §9 of the design doc for the equality side,
/// where `tags` *is* in the bare-string set.
const REGEX_BARE_FIELDS: &[&str] = &[
    "catalog",
    "exported",
    "resource",
    "sourcefile",
    "sourceline",
    "title",
    "type",
];

fn eq_v2_inner(path_term: &Term, value_term: &Term, db: &dyn DbPrimitives) -> Result<TermResult> {
    match path_term.as_path() {
        Some(Path::Bare("tag")) => {
            let value = term_as_text(value_term).to_lowercase();
            let where_sql = db.array_contains_match("catalog_resources.tags");
            Ok(TermResult::Fragment(Fragment::leaf(
                where_sql,
                vec![term_to_param(&Term::String(value))],
            )))
        }
        Some(Path::Bare("certname")) => Ok(TermResult::Fragment(Fragment::leaf(
            "certname_catalogs.certname = ?",
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
        Some(Path::Namespaced("parameter", name)) => {
            let serialized = db.serialize(&term_to_scalar(value_term));
            Ok(TermResult::Fragment(Fragment::leaf(
                "catalog_resources.resource IN (SELECT rp.resource FROM resource_params rp WHERE rp.name = ? AND rp.value = ?)",
                vec![term_to_param(&Term::String(name.to_string())), serialized],
            )))
        }
        Some(Path::Bare(field)) if EQ_BARE_FIELDS.contains(&field) => {
            Ok(TermResult::Fragment(Fragment::leaf(
                format!("catalog_resources.{field} = ?"),
                vec![term_to_param(value_term)],
            )))
        }
        _ => Err(unqueryable_field(
            &path_term.render(),
            " for resources",
            &["catalog", "certname", "exported", "resource", "sourcefile", "sourceline", "tag", "tags", "title", "type"],
        )),
    }
}

/// `(= path value)` under resource-v2: bare `certname` is accepted.
pub fn compile_resource_eq_v2(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, value_term) = require_two("=", args)?;
    eq_v2_inner(path_term, value_term, db)
}

/// `(= path value)` under resource-v1: bare `certname` is rejected,
/// `["node","name"]` is rewritten to `certname` before delegating.
pub fn compile_resource_eq_v1(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, value_term) = require_two("=", args)?;
    match path_term.as_path() {
        Some(Path::Bare("certname")) => Err(unqueryable_field(
            "certname",
            " for resources (v1); use [\"node\", \"name\"] instead",
            &[
                "catalog", "exported", "node.name", "resource", "sourcefile", "sourceline", "tag",
                "tags", "title", "type",
            ],
        )),
        Some(Path::Namespaced("node", "name")) => {
            let rewritten = Term::String("certname".to_string());
            eq_v2_inner(&rewritten, value_term, db)
        }
        _ => eq_v2_inner(path_term, value_term, db),
    }
}

/// `(~ path pattern)` under resource-v2 (v1 never registers `~`).
pub fn compile_resource_regex(
    _table: &'static DialectTable,
    args: &[Term],
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let (path_term, pattern_term) = require_two("~", args)?;
    match path_term.as_path() {
        Some(Path::Bare("tag")) => {
            let where_sql = db.regex_array_match("catalog_resources", "tags");
            Ok(TermResult::Fragment(Fragment::leaf(
                where_sql,
                vec![term_to_param(pattern_term)],
            )))
        }
        Some(Path::Bare("certname")) => {
            let where_sql = db.regex_match("certname_catalogs.certname");
            Ok(TermResult::Fragment(Fragment::leaf(
                where_sql,
                vec![term_to_param(pattern_term)],
            )))
        }
        Some(Path::Bare(field)) if REGEX_BARE_FIELDS.contains(&field) => {
            let where_sql = db.regex_match(&format!("catalog_resources.{field}"));
            Ok(TermResult::Fragment(Fragment::leaf(
                where_sql,
                vec![term_to_param(pattern_term)],
            )))
        }
        _ => Err(unqueryable_field(
            &path_term.render(),
            " for resources",
            &["catalog", "certname", "exported", "resource", "sourcefile", "sourceline", "tag", "title", "type"],
        )),
    }
}
