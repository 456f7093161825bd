//! spindex: an in-memory inverted index with term, span-term and boolean
//! queries and deterministic, reproducible ranking.
//!
//! ```
//! use spindex::index::{Directory, IndexReader, IndexWriter, OpenMode};
//! use spindex::query::{execute, BoolQuery, TermQuery};
//!
//! let dir = Directory::default();
//! let mut writer = IndexWriter::open(&dir, OpenMode::Create).unwrap();
//! writer.add_document(vec![("body", "Should we, could we, would we?")]).unwrap();
//! writer.add_document(vec![("body", "It shouldn't.")]).unwrap();
//! writer.close().unwrap();
//!
//! let reader = IndexReader::open(&dir).unwrap();
//! let query = BoolQuery::new()
//!     .must(TermQuery::new("body", "should"))
//!     .must(TermQuery::new("body", "we"));
//! let hits = execute(&query, &reader, 10).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod models;
pub mod query;
pub mod similarity;
pub mod testing;
pub mod tokenizer;

pub use config::{IndexSettings, SimilaritySettings, TokenizerConfig};
pub use error::{Result, SpindexError};
pub use models::*;
pub use similarity::{DefaultSimilarity, NormEncoding, Similarity};
pub use tokenizer::{Token, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
