//! Term query - exact match on a field

use serde::{Deserialize, Serialize};

use crate::index::Term;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::query::scorer::{DocScorer, LeafWeight, TermScorer};
use crate::Result;

/// Query that matches documents containing an exact term in a field
///
/// The text is matched as-is against indexed terms; it is not run through
/// the tokenizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    /// Field to search in
    pub field: String,
    /// Exact term to match
    pub term: String,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

pub(crate) fn default_boost() -> f32 {
    1.0
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn term(&self) -> Term {
        Term::new(self.field.as_str(), self.term.as_str())
    }
}

impl QueryNode for TermQuery {
    fn scorer<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn DocScorer + 'a>>> {
        let term = self.term();
        let Some(postings) = ctx.postings(&term)? else {
            return Ok(None);
        };
        let weight = LeafWeight::new(ctx, &self.field, ctx.idf(&term)?, self.boost)?;
        Ok(Some(Box::new(TermScorer::new(postings.cursor(), weight))))
    }

    fn sum_of_squared_weights(&self, ctx: &QueryContext<'_>) -> Result<f32> {
        let weight = ctx.idf(&self.term())? * self.boost;
        Ok(weight * weight)
    }

    fn query_type(&self) -> &'static str {
        "term"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
