//! Shared error constructors used by several operator compilers.

use cmq_ast::Term;
use cmq_core::{QueryError, Result};

/// Build an `UnqueryableField` error with the accepted set alphabetized, per
/// §7's requirement that the message list the acceptable field set in order.
#[must_use]
pub fn unqueryable_field(field: &str, context: &str, accepted: &[&str]) -> QueryError {
    let mut accepted: Vec<String> = accepted.iter().map(|s| s.to_string()).collect();
    accepted.sort();
    QueryError::UnqueryableField {
        field: field.to_string(),
        context: context.to_string(),
        accepted,
    }
}

/// Require exactly two operands, the common arity for leaf predicates.
pub fn require_two<'a>(op: &str, args: &'a [Term]) -> Result<(&'a Term, &'a Term)> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(QueryError::ArityError {
            operator: op.to_string(),
            expected: "2".to_string(),
            actual: args.len(),
        }),
    }
}

/// Require exactly one operand, used by `select-resources`/`select-facts`.
pub fn require_one<'a>(op: &str, args: &'a [Term]) -> Result<&'a Term> {
    match args {
        [a] => Ok(a),
        _ => Err(QueryError::ArityError {
            operator: op.to_string(),
            expected: "1".to_string(),
            actual: args.len(),
        }),
    }
}
