//! Bound SQL parameter values.

use serde::{Deserialize, Serialize};

/// A single bound SQL parameter, passed through to the database driver.
///
/// Every `?` placeholder emitted by the compiler corresponds to exactly one
/// `Param` at the matching position in the returned parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}
