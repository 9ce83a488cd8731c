//! Conversions from AST leaf [`Term`]s to the scalar types the rest of the
//! compiler (and the host's [`DbPrimitives`]) work with.

use cmq_ast::Term;
use cmq_core::{Param, ScalarValue};

/// View a leaf term as a [`ScalarValue`], the type `DbPrimitives::serialize`
/// and truthiness checks operate on.
#[must_use]
pub fn term_to_scalar(term: &Term) -> ScalarValue {
    match term {
        Term::String(s) => ScalarValue::Text(s.clone()),
        Term::Number(n) => ScalarValue::Float(*n),
        Term::Boolean(b) => ScalarValue::Boolean(*b),
        Term::List(_) => ScalarValue::Text(term.render()),
    }
}

/// View a leaf term as a bound [`Param`], used wherever a value is passed
/// straight through to the database driver unchanged.
#[must_use]
pub fn term_to_param(term: &Term) -> Param {
    match term {
        Term::String(s) => Param::Text(s.clone()),
        Term::Number(n) => Param::Float(*n),
        Term::Boolean(b) => Param::Boolean(*b),
        Term::List(_) => Param::Text(term.render()),
    }
}

/// Stringify a leaf term, used where storage treats the column as text
/// regardless of the literal's AST type (fact values, tag names).
#[must_use]
pub fn term_as_text(term: &Term) -> String {
    match term {
        Term::String(s) => s.clone(),
        Term::Number(n) => n.to_string(),
        Term::Boolean(b) => b.to_string(),
        Term::List(_) => term.render(),
    }
}
