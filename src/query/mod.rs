//! Query model and execution engine
//!
//! Supported queries:
//! - Term queries (exact match on an indexed term)
//! - Span term queries (term matches that also expose positions)
//! - Boolean queries (MUST, SHOULD, MUST_NOT), nestable
//!
//! # Example
//!
//! ```
//! use spindex::index::{Directory, IndexReader, IndexWriter, OpenMode};
//! use spindex::query::{BoolQuery, Searcher, SpanTermQuery};
//!
//! let dir = Directory::default();
//! let mut writer = IndexWriter::open(&dir, OpenMode::Create).unwrap();
//! writer.add_document(vec![("text", "Should we, should we?")]).unwrap();
//! writer.close().unwrap();
//!
//! let reader = IndexReader::open(&dir).unwrap();
//! let query = BoolQuery::new()
//!     .should(SpanTermQuery::new("text", "should"))
//!     .should(SpanTermQuery::new("text", "we"));
//! let top = Searcher::new(&reader).search(&query, 10).unwrap();
//! assert_eq!(top.total_hits, 1);
//! ```

pub mod ast;
pub mod collector;
pub mod context;
pub mod executor;
pub mod nodes;
pub mod scorer;
pub mod spans;
pub mod types;

pub use ast::{QueryNode, QueryNodeRef};
pub use collector::TopDocsCollector;
pub use context::QueryContext;
pub use executor::{execute, Searcher};
pub use nodes::{BoolQuery, SpanQuery, SpanTermQuery, TermQuery};
pub use scorer::{BooleanScorer, DocScorer, LeafWeight, TermScorer};
pub use spans::{Span, SpanScorer, Spans, TermSpans};
pub use types::*;
