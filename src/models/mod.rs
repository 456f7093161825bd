pub mod document;
pub mod search;

pub use document::{DocId, Document, Field, FieldKind, StoredDocument};
pub use search::{ScoredDoc, TopDocs};
