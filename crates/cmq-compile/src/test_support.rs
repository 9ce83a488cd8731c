//! Fixed database-primitive stubs shared by this crate's test suite.
//!
//! These are deliberately the stubs the design spec pins test output to:
//! regex match emits `<col> ~ ?`, numeric cast emits `CAST(<col> AS FLOAT)`,
//! array-contains emits `? = ANY(<col>)`, and `serialize` is the identity
//! function over scalar variants. Never used by production callers — a real
//! host implements [`DbPrimitives`] against its actual database.

use cmq_core::{DbPrimitives, Param, ScalarValue};

pub struct StubPrimitives;

#[must_use]
pub fn stub_primitives() -> StubPrimitives {
    StubPrimitives
}

impl DbPrimitives for StubPrimitives {
    fn serialize(&self, value: &ScalarValue) -> Param {
        match value {
            ScalarValue::Text(s) => Param::Text(s.clone()),
            ScalarValue::Integer(i) => Param::Integer(*i),
            ScalarValue::Float(f) => Param::Float(*f),
            ScalarValue::Boolean(b) => Param::Boolean(*b),
        }
    }

    fn numeric_cast(&self, column_sql: &str) -> String {
        format!("CAST({column_sql} AS FLOAT)")
    }

    fn regex_match(&self, column_sql: &str) -> String {
        format!("{column_sql} ~ ?")
    }

    fn regex_array_match(&self, table: &str, column: &str) -> String {
        format!("EXISTS (SELECT 1 FROM unnest({table}.{column}) elem(v) WHERE v ~ ?)")
    }

    fn array_contains_match(&self, column: &str) -> String {
        format!("? = ANY({column})")
    }

    fn parse_number(&self, s: &str) -> Option<f64> {
        s.parse::<f64>().ok()
    }
}
