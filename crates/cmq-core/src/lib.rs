//! # cmq-core
//!
//! Foundational types shared by the query AST and the term compiler:
//! - Error hierarchy ([`QueryError`])
//! - Bound parameter values ([`Param`])
//! - Dialect and dataset-kind selection ([`Dialect`], [`DatasetKind`])
//! - The host-provided [`DbPrimitives`] trait and its [`ScalarValue`] operand type

pub mod dialect;
pub mod error;
pub mod param;
pub mod primitives;

pub use dialect::{DatasetKind, Dialect};
pub use error::{QueryError, Result};
pub use param::Param;
pub use primitives::{DbPrimitives, ScalarValue};
