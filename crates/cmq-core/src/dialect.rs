//! Dialect and dataset-kind selection.
//!
//! A [`Dialect`] names one of the operator tables the compiler can run a
//! query through; it is the only "configuration" this crate takes — there is
//! no config file or environment variable, the caller picks a dialect per
//! query. A [`DatasetKind`] names which of the two base tables (resources or
//! facts) a query or subquery targets.

use serde::{Deserialize, Serialize};

/// Which operator table governs compilation of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Legacy resource query dialect: no subqueries, `certname` reached only
    /// via `["node", "name"]`.
    ResourceV1,
    /// Current resource query dialect: subqueries, bare `certname`, regex.
    ResourceV2,
    /// Current fact query dialect.
    FactV2,
}

impl Dialect {
    /// The dataset kind this dialect's top-level queries target.
    #[must_use]
    pub fn dataset_kind(self) -> DatasetKind {
        match self {
            Self::ResourceV1 | Self::ResourceV2 => DatasetKind::Resource,
            Self::FactV2 => DatasetKind::Fact,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ResourceV1 => "resource-v1",
            Self::ResourceV2 => "resource-v2",
            Self::FactV2 => "fact-v2",
        };
        write!(f, "{name}")
    }
}

/// Which base table and selectable-column whitelist a (sub)query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Resource,
    Fact,
}

impl DatasetKind {
    /// The selectable columns for this dataset, alphabetically ordered.
    ///
    /// Used both to validate `=`/`~`/`project`/`in-result` field arguments
    /// and to render the accepted-field list inside `UnqueryableField`
    /// errors.
    #[must_use]
    pub fn selectable_columns(self) -> &'static [&'static str] {
        match self {
            Self::Resource => &[
                "catalog",
                "certname",
                "exported",
                "resource",
                "sourcefile",
                "sourceline",
                "tags",
                "title",
                "type",
            ],
            Self::Fact => &["certname", "name", "value"],
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Resource => "resource",
            Self::Fact => "fact",
        };
        write!(f, "{name}")
    }
}
