//! Abstract Syntax Tree for query representation
//!
//! Every query type implements `QueryNode`. Evaluation runs in two passes:
//! the searcher first collects `sum_of_squared_weights` over the tree to
//! derive the query norm, then asks the root for a `DocScorer` that walks
//! matching documents in ascending doc id order.

use std::fmt::Debug;
use std::sync::Arc;

use super::context::QueryContext;
use super::scorer::DocScorer;
use crate::Result;

/// Reference-counted query node for sharing a tree between searches
pub type QueryNodeRef = Arc<dyn QueryNode>;

/// Core trait for all query nodes in the AST
pub trait QueryNode: Send + Sync + Debug {
    /// Build a cursor over the matching documents
    ///
    /// Returns `Ok(None)` when nothing can match, e.g. the term is absent.
    /// The cursor borrows postings from the context's reader.
    fn scorer<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn DocScorer + 'a>>>;

    /// Squared, boosted idf of every scoring leaf under this node
    fn sum_of_squared_weights(&self, ctx: &QueryContext<'_>) -> Result<f32>;

    /// Get the query type name for debugging and logging
    fn query_type(&self) -> &'static str;

    /// Get the boost factor for this query
    fn boost(&self) -> f32 {
        1.0
    }

    /// Clone this query node into a boxed trait object
    fn clone_box(&self) -> Box<dyn QueryNode>;
}

impl Clone for Box<dyn QueryNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<Q: QueryNode + ?Sized> QueryNode for Box<Q> {
    fn scorer<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn DocScorer + 'a>>> {
        (**self).scorer(ctx)
    }

    fn sum_of_squared_weights(&self, ctx: &QueryContext<'_>) -> Result<f32> {
        (**self).sum_of_squared_weights(ctx)
    }

    fn query_type(&self) -> &'static str {
        (**self).query_type()
    }

    fn boost(&self) -> f32 {
        (**self).boost()
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        (**self).clone_box()
    }
}
