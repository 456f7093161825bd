//! Concrete query node implementations
//!
//! This module provides implementations of the `QueryNode` trait for
//! various query types.

mod bool_query;
mod span_term_query;
mod term_query;

pub use bool_query::BoolQuery;
pub use span_term_query::{SpanQuery, SpanTermQuery};
pub use term_query::TermQuery;
