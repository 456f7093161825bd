//! Inverted index: postings, stored documents and field statistics.
//!
//! # Architecture
//!
//! - `MutableBuffer`: per-session write buffer owned by an `IndexWriter`
//! - `Commit`: immutable, point-in-time index state
//! - `Directory`: holds the latest `Commit` and the single-writer lock
//! - `IndexReader`: a snapshot of one `Commit`
//!
//! Writes become visible only when `IndexWriter::close` publishes a new
//! commit; readers opened earlier keep their snapshot.

mod buffer;
mod directory;
mod doc_store;
mod postings;
mod reader;
mod statistics;
mod types;
mod writer;

pub use buffer::*;
pub use directory::*;
pub use doc_store::*;
pub use postings::*;
pub use reader::*;
pub use statistics::*;
pub use types::*;
pub use writer::*;
