//! # cmq-ast
//!
//! Query AST ([`Term`], [`Path`]) and the compiled-fragment algebra
//! ([`Fragment`], [`TermResult`], [`FinalizedSelect`]) the term compiler in
//! `cmq-compile` builds up as it walks a query.

pub mod ast;
pub mod fragment;

pub use ast::{Path, Term};
pub use fragment::{union_joins, Fragment, FinalizedSelect, TermResult};
