//! The term compiler: the recursive dispatcher every operator compiler
//! bottoms out through when it needs to compile a child term.

use cmq_ast::{Term, TermResult};
use cmq_core::{DbPrimitives, QueryError, Result};

use crate::table::DialectTable;

/// Compile one AST node against `table`.
///
/// Fails with [`QueryError::MalformedQuery`] if `node` is not a non-empty
/// list headed by an operator string, with [`QueryError::UnknownOperator`]
/// if the (lowercased) operator isn't in `table` at all, and with
/// [`QueryError::UnsupportedInDialect`] if it's in the language but
/// disallowed in this dialect. Otherwise dispatches to the resolved
/// compiler with the remaining operands.
pub fn compile_term(
    table: &'static DialectTable,
    node: &Term,
    db: &dyn DbPrimitives,
) -> Result<TermResult> {
    let Some((operator, args)) = node.as_application() else {
        return Err(QueryError::MalformedQuery(format!(
            "expected a non-empty list headed by an operator string, found {}",
            node.render()
        )));
    };

    let lowered = operator.to_ascii_lowercase();
    let compiler = table.resolve(&lowered, node)?;
    compiler(table, args, db)
}
