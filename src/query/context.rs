//! Query execution context
//!
//! The `QueryContext` gives query nodes access to the reader snapshot, the
//! similarity in force, and the query norm computed for the current search.

use std::fmt;

use crate::error::{Result, SpindexError};
use crate::index::{FieldLengths, IndexReader, PostingsList, Term};
use crate::similarity::Similarity;

/// Query execution context borrowed from a reader for one search
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    reader: &'a IndexReader,
    similarity: &'a dyn Similarity,
    query_norm: f32,
    strict_fields: bool,
}

impl<'a> QueryContext<'a> {
    /// Create a context with a neutral query norm
    pub fn new(reader: &'a IndexReader, similarity: &'a dyn Similarity) -> Self {
        Self {
            reader,
            similarity,
            query_norm: 1.0,
            strict_fields: reader.settings().strict_fields,
        }
    }

    pub fn with_query_norm(mut self, query_norm: f32) -> Self {
        self.query_norm = query_norm;
        self
    }

    pub fn with_strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    pub fn reader(&self) -> &'a IndexReader {
        self.reader
    }

    pub fn similarity(&self) -> &'a dyn Similarity {
        self.similarity
    }

    pub fn query_norm(&self) -> f32 {
        self.query_norm
    }

    pub fn strict_fields(&self) -> bool {
        self.strict_fields
    }

    /// Live documents in the snapshot
    pub fn num_docs(&self) -> Result<u32> {
        self.reader.num_docs()
    }

    /// Fails with `UnknownField` in strict mode when no document indexed `field`
    pub fn check_field(&self, field: &str) -> Result<()> {
        if self.strict_fields && !self.reader.has_field(field)? {
            return Err(SpindexError::UnknownField(field.to_string()));
        }
        Ok(())
    }

    /// Postings of `term`, or `None` when the term never occurs
    pub fn postings(&self, term: &Term) -> Result<Option<&'a PostingsList>> {
        self.check_field(term.field())?;
        Ok(self
            .reader
            .postings_ref(term)?
            .filter(|list| !list.is_empty()))
    }

    /// Inverse document frequency of `term` within this snapshot
    pub fn idf(&self, term: &Term) -> Result<f32> {
        self.check_field(term.field())?;
        let doc_freq = self.reader.doc_freq(term)?;
        Ok(self.similarity.idf(doc_freq, self.num_docs()?))
    }

    pub(crate) fn field_lengths(&self, field: &str) -> Result<Option<&'a FieldLengths>> {
        self.reader.field_lengths(field)
    }
}

impl fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("similarity", &self.similarity)
            .field("query_norm", &self.query_norm)
            .field("strict_fields", &self.strict_fields)
            .finish()
    }
}
