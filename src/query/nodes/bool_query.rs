//! Boolean query - combines multiple clauses with AND, OR, NOT semantics

use crate::error::SpindexError;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::query::scorer::{BooleanScorer, DocScorer};
use crate::query::types::{BooleanClause, Occur};
use crate::Result;

/// Boolean query combining multiple clauses
///
/// Clauses keep the order they were added in. There are three kinds:
/// - `must`: every clause must match. Contributes to the score.
/// - `should`: optional unless there are no `must` clauses, in which case
///   at least one has to match. Contributes to the score.
/// - `must_not`: documents matching any of these are excluded.
///
/// The score of a match is `coord * Σ clause scores * boost`, where coord is
/// the fraction of `must` and `should` clauses the document matched. A query
/// without any `must` or `should` clause cannot be evaluated.
///
/// # Example
///
/// ```
/// use spindex::query::{BoolQuery, TermQuery};
///
/// let query = BoolQuery::new()
///     .must(TermQuery::new("text", "should"))
///     .should(TermQuery::new("text", "we"))
///     .must_not(TermQuery::new("text", "could"));
/// assert_eq!(query.clauses().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct BoolQuery {
    clauses: Vec<BooleanClause>,
    /// Boost factor for scoring
    pub boost: f32,
}

impl Default for BoolQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl BoolQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            boost: 1.0,
        }
    }

    /// Add a must clause
    pub fn must(self, query: impl QueryNode + 'static) -> Self {
        self.add(query, Occur::Must)
    }

    /// Add a should clause
    pub fn should(self, query: impl QueryNode + 'static) -> Self {
        self.add(query, Occur::Should)
    }

    /// Add a must_not clause
    pub fn must_not(self, query: impl QueryNode + 'static) -> Self {
        self.add(query, Occur::MustNot)
    }

    pub fn add(self, query: impl QueryNode + 'static, occur: Occur) -> Self {
        self.add_boxed(Box::new(query), occur)
    }

    /// Add a clause (boxed)
    pub fn add_boxed(mut self, query: Box<dyn QueryNode>, occur: Occur) -> Self {
        self.clauses.push(BooleanClause::new(query, occur));
        self
    }

    /// Set boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Check if this is an empty query
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of `must` and `should` clauses
    pub fn scoring_clause_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.occur.is_scoring()).count()
    }

    fn ensure_scoring_clause(&self) -> Result<()> {
        if self.scoring_clause_count() == 0 {
            return Err(SpindexError::EmptyQuery);
        }
        Ok(())
    }
}

impl QueryNode for BoolQuery {
    fn scorer<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn DocScorer + 'a>>> {
        self.ensure_scoring_clause()?;

        let mut scoring = Vec::new();
        let mut prohibited = Vec::new();
        let mut required_missing = false;

        // Every clause is built even after a required one came back empty,
        // so errors from nested clauses always surface.
        for clause in &self.clauses {
            let scorer = clause.query.scorer(ctx)?;
            match (clause.occur, scorer) {
                (Occur::Must, None) => required_missing = true,
                (Occur::MustNot, Some(scorer)) => prohibited.push(scorer),
                (occur, Some(scorer)) => scoring.push((occur, scorer)),
                (_, None) => {}
            }
        }

        if required_missing || scoring.is_empty() {
            return Ok(None);
        }

        let scorer = BooleanScorer::new(
            scoring,
            prohibited,
            self.scoring_clause_count(),
            ctx.similarity(),
            self.boost,
        );
        if scorer.doc().is_none() {
            return Ok(None);
        }
        Ok(Some(Box::new(scorer)))
    }

    fn sum_of_squared_weights(&self, ctx: &QueryContext<'_>) -> Result<f32> {
        self.ensure_scoring_clause()?;

        let mut sum = 0.0;
        for clause in self.clauses.iter().filter(|c| c.occur.is_scoring()) {
            sum += clause.query.sum_of_squared_weights(ctx)?;
        }
        Ok(sum * self.boost * self.boost)
    }

    fn query_type(&self) -> &'static str {
        "bool"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
