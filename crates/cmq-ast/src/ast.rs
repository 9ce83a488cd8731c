//! AST types for structured queries.
//!
//! A query is a [`Term`], produced by whatever transport layer deserializes
//! the client's request (JSON arrays, typically) and consumed by the term
//! compiler in `cmq-compile`. This crate has no lexer or grammar: clients
//! submit already-structured nested expressions, never raw query text.

use serde::{Deserialize, Serialize};

/// A node in a structured query.
///
/// Lists are operator applications: the first element is always a
/// non-empty operator string, and the remaining elements are operand
/// `Term`s. A bare `String`/`Number`/`Boolean` is a leaf operand, not an
/// operator application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<Term>),
}

impl Term {
    /// View this term as an operator application: `(operator, operands)`.
    ///
    /// Returns `None` if the term is not a list, is empty, or its head is
    /// not a string — the term compiler turns a `None` here into
    /// `MalformedQuery`.
    #[must_use]
    pub fn as_application(&self) -> Option<(&str, &[Term])> {
        let Term::List(items) = self else {
            return None;
        };
        let (head, tail) = items.split_first()?;
        let Term::String(op) = head else {
            return None;
        };
        Some((op.as_str(), tail))
    }

    /// View this term as a bare string leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Term::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render this term the way `UnknownOperator`/`MalformedQuery` messages
    /// quote the offending node: compact, not pretty-printed.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Term::String(s) => format!("\"{s}\""),
            Term::Number(n) => n.to_string(),
            Term::Boolean(b) => b.to_string(),
            Term::List(items) => {
                let parts: Vec<String> = items.iter().map(Term::render).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// A field path operand: either a bare column name or a two-element
/// `[namespace, member]` list such as `["node", "active"]` or
/// `["parameter", "ensure"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path<'a> {
    Bare(&'a str),
    Namespaced(&'a str, &'a str),
}

impl Term {
    /// Interpret this term as a field path, per §3.1/§6.3.
    ///
    /// Returns `None` for anything that is neither a bare string nor a
    /// two-element list of strings — callers turn that into
    /// `UnqueryableField` or `MalformedQuery` depending on context.
    #[must_use]
    pub fn as_path(&self) -> Option<Path<'_>> {
        match self {
            Term::String(s) => Some(Path::Bare(s.as_str())),
            Term::List(items) => match items.as_slice() {
                [Term::String(ns), Term::String(member)] => {
                    Some(Path::Namespaced(ns.as_str(), member.as_str()))
                }
                _ => None,
            },
            _ => None,
        }
    }
}
