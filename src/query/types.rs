//! Core types for the query system

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ast::QueryNode;

/// How a clause takes part in a boolean query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Required. Contributes to the score.
    Must,
    /// Optional. Contributes to the score when it matches.
    Should,
    /// Excludes matching documents. Never scores.
    MustNot,
}

impl Occur {
    /// Whether clauses with this occurrence feed the score and coord
    pub fn is_scoring(self) -> bool {
        !matches!(self, Occur::MustNot)
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Occur::Must => "MUST",
            Occur::Should => "SHOULD",
            Occur::MustNot => "MUST_NOT",
        };
        f.write_str(name)
    }
}

/// One clause of a boolean query
#[derive(Clone, Debug)]
pub struct BooleanClause {
    pub query: Box<dyn QueryNode>,
    pub occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Box<dyn QueryNode>, occur: Occur) -> Self {
        Self { query, occur }
    }
}

/// Query execution statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryStats {
    /// Documents that matched the query
    pub docs_matched: u64,
    /// Hits returned after the limit was applied
    pub docs_returned: usize,
    /// Query norm applied to every leaf weight
    pub query_norm: f32,
    /// Query execution time in microseconds
    pub execution_time_us: u64,
}
