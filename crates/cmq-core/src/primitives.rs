//! Host-provided database primitives.
//!
//! The compiler never hand-writes a regex operator, a numeric cast, or a
//! storage serialization rule: those are dialect-of-the-underlying-database
//! concerns (PostgreSQL `~`, SQLite `REGEXP`, …) that live outside this
//! crate. Implementors plug in a [`DbPrimitives`] once per backing database
//! and pass it by reference into every compilation.

use crate::param::Param;

/// Arbitrary operand values the AST can carry as a leaf (see
/// `cmq_ast::Term::Boolean`/`Number`/`String` — re-expressed here without a
/// dependency on `cmq-ast` so `cmq-core` stays leaf-most in the workspace).
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ScalarValue {
    /// Truthiness used by `["node", "active"]` predicates: booleans follow
    /// their own value, numbers are truthy unless zero, and text is truthy
    /// unless empty or `"false"`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty() && s != "false",
        }
    }

    /// Stringify for contexts that store facts/log messages as text (e.g.
    /// `["=", "value", v]` on the fact table, which is stored as a string
    /// column regardless of the literal's AST type).
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

/// Database-specific building blocks the term compiler calls out to.
///
/// None of these return a complete `Fragment` — they return just the SQL
/// text the compiler embeds into one. Keeping them on a trait (rather than
/// free functions) lets a host swap in PostgreSQL-flavored regex/cast SQL
/// without this crate depending on any particular driver.
pub trait DbPrimitives {
    /// Turn an arbitrary operand value into a single bound parameter, used
    /// for resource `["parameter", name]` values which may be non-scalar in
    /// storage (e.g. JSON-encoded).
    fn serialize(&self, value: &ScalarValue) -> Param;

    /// A SQL expression coercing `column_sql` to a numeric type, or NULL on
    /// failure (e.g. `CAST(<col> AS FLOAT)`, or a dialect-specific safe-cast
    /// expression for databases without a throwing `CAST`).
    fn numeric_cast(&self, column_sql: &str) -> String;

    /// The `<col> <op> ?` form for the underlying database's regex operator.
    /// Exactly one `?` must appear in the returned string.
    fn regex_match(&self, column_sql: &str) -> String;

    /// Regex match against any element of an array-typed column.
    fn regex_array_match(&self, table: &str, column: &str) -> String;

    /// Membership test against an array-typed column, binding one `?` as the
    /// candidate element.
    fn array_contains_match(&self, column: &str) -> String;

    /// Lenient numeric parse; `None` if `s` is not a valid number.
    fn parse_number(&self, s: &str) -> Option<f64>;
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Non-empty, non-"false" text is always truthy; the reverse also
        /// holds for the two falsy text sentinels.
        #[test]
        fn text_truthiness_matches_emptiness_and_false_sentinel(s in "[a-zA-Z0-9]{0,12}") {
            let expected = !s.is_empty() && s != "false";
            prop_assert_eq!(ScalarValue::Text(s).is_truthy(), expected);
        }

        /// Nonzero integers and floats are always truthy; zero never is.
        #[test]
        fn numeric_truthiness_matches_nonzero(i in any::<i64>()) {
            prop_assert_eq!(ScalarValue::Integer(i).is_truthy(), i != 0);
        }
    }
}
