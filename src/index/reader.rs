//! Index reader: an immutable snapshot of one commit
//!
//! The snapshot is fixed at `open`; later commits are invisible to it.
//! After `close`, every lookup fails with `ClosedIndex`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::directory::{Commit, Directory};
use super::postings::PostingsList;
use super::statistics::FieldLengths;
use super::types::{DocId, Generation, Term};
use crate::config::IndexSettings;
use crate::error::{Result, SpindexError};
use crate::models::StoredDocument;
use crate::tokenizer::Tokenizer;

/// Read-only view over a committed index state
#[derive(Debug)]
pub struct IndexReader {
    commit: Arc<Commit>,
    settings: Arc<IndexSettings>,
    tokenizer: Arc<Tokenizer>,
    closed: AtomicBool,
}

impl IndexReader {
    /// Capture the latest commit of `directory`
    pub fn open(directory: &Directory) -> Result<Self> {
        let commit = directory.current_commit();
        debug!(
            generation = commit.generation(),
            num_docs = commit.num_docs(),
            "index reader opened"
        );

        Ok(Self {
            commit,
            settings: Arc::clone(directory.settings()),
            tokenizer: Arc::clone(directory.tokenizer()),
            closed: AtomicBool::new(false),
        })
    }

    /// Release the snapshot. Further lookups fail with `ClosedIndex`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(generation = self.commit.generation(), "index reader closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<&Commit> {
        if self.is_closed() {
            Err(SpindexError::ClosedIndex)
        } else {
            Ok(&self.commit)
        }
    }

    /// Live documents in the snapshot
    pub fn num_docs(&self) -> Result<u32> {
        Ok(self.ensure_open()?.num_docs())
    }

    /// Doc ids ever assigned, deleted ones included
    pub fn max_doc(&self) -> Result<u32> {
        Ok(self.ensure_open()?.max_doc())
    }

    pub fn generation(&self) -> Result<Generation> {
        Ok(self.ensure_open()?.generation())
    }

    /// Postings of `term`; empty when the term never occurs
    pub fn postings(&self, term: &Term) -> Result<Arc<PostingsList>> {
        Ok(self
            .ensure_open()?
            .postings(term)
            .cloned()
            .unwrap_or_default())
    }

    /// Borrowed postings for query evaluation
    pub(crate) fn postings_ref(&self, term: &Term) -> Result<Option<&PostingsList>> {
        Ok(self.ensure_open()?.postings(term).map(|list| list.as_ref()))
    }

    pub fn doc_freq(&self, term: &Term) -> Result<u32> {
        Ok(self
            .ensure_open()?
            .postings(term)
            .map_or(0, |list| list.doc_freq()))
    }

    /// Stored fields of a document, deleted documents included
    pub fn document(&self, doc_id: DocId) -> Result<Option<StoredDocument>> {
        Ok(self.ensure_open()?.docs().get(doc_id))
    }

    /// First stored value of `field`, without copying the whole document
    pub fn stored_value(&self, doc_id: DocId, field: &str) -> Result<Option<String>> {
        Ok(self
            .ensure_open()?
            .docs()
            .get_arc(doc_id)
            .and_then(|doc| doc.get(field))
            .map(str::to_string))
    }

    pub fn is_live(&self, doc_id: DocId) -> Result<bool> {
        Ok(self.ensure_open()?.docs().is_live(doc_id))
    }

    /// Token count of `field` in `doc_id` (0 when absent)
    pub fn field_length(&self, doc_id: DocId, field: &str) -> Result<u32> {
        Ok(self.ensure_open()?.field_stats().field_length(doc_id, field))
    }

    pub(crate) fn field_lengths(&self, field: &str) -> Result<Option<&FieldLengths>> {
        Ok(self.ensure_open()?.field_stats().field(field))
    }

    /// Whether any document has indexed `field`
    pub fn has_field(&self, field: &str) -> Result<bool> {
        Ok(self.ensure_open()?.field_stats().has_field(field))
    }

    /// Indexed field names in sorted order
    pub fn fields(&self) -> Result<Vec<String>> {
        Ok(self
            .ensure_open()?
            .field_stats()
            .field_names()
            .map(str::to_string)
            .collect())
    }

    /// Terms of `field` in sorted order
    pub fn terms(&self, field: &str) -> Result<Vec<String>> {
        Ok(self
            .ensure_open()?
            .terms(field)
            .map(|t| t.text().to_string())
            .collect())
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexWriter, OpenMode};
    use crate::models::Document;

    fn build_directory() -> Directory {
        let dir = Directory::default();
        let mut writer = IndexWriter::open(&dir, OpenMode::Create).unwrap();
        writer
            .add_document(
                Document::new()
                    .keyword("id", "1")
                    .text("text", "I think it should work."),
            )
            .unwrap();
        writer
            .add_document(
                Document::new()
                    .keyword("id", "2")
                    .text("text", "It shouldn't."),
            )
            .unwrap();
        writer.close().unwrap();
        dir
    }

    #[test]
    fn test_reader_basic() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();

        assert_eq!(reader.num_docs().unwrap(), 2);
        assert_eq!(reader.max_doc().unwrap(), 2);
        assert_eq!(reader.generation().unwrap(), 1);
        assert_eq!(reader.doc_freq(&Term::new("text", "should")).unwrap(), 1);
        assert_eq!(reader.doc_freq(&Term::new("text", "shouldn't")).unwrap(), 1);
        assert_eq!(reader.doc_freq(&Term::new("text", "missing")).unwrap(), 0);
        assert_eq!(reader.field_length(DocId(0), "text").unwrap(), 4);
        assert_eq!(reader.fields().unwrap(), vec!["id", "text"]);
    }

    #[test]
    fn test_postings_roundtrip() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();

        let postings = reader.postings(&Term::new("text", "should")).unwrap();
        let posting = postings.get(DocId(0)).unwrap();
        assert_eq!(posting.positions, vec![2]);

        assert!(reader
            .postings(&Term::new("text", "absent"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_stored_fields() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();

        let doc = reader.document(DocId(1)).unwrap().unwrap();
        assert_eq!(doc.get("id"), Some("2"));
        assert!(doc.live);
        assert_eq!(
            reader.stored_value(DocId(0), "text").unwrap().as_deref(),
            Some("I think it should work.")
        );
        assert!(reader.document(DocId(9)).unwrap().is_none());
    }

    #[test]
    fn test_terms_sorted() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();
        assert_eq!(
            reader.terms("text").unwrap(),
            vec!["i", "should", "shouldn't", "think", "work"]
        );
    }

    #[test]
    fn test_closed_reader() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();
        reader.close();
        reader.close();

        assert!(reader.is_closed());
        assert!(matches!(reader.num_docs(), Err(SpindexError::ClosedIndex)));
        assert!(matches!(
            reader.postings(&Term::new("text", "should")),
            Err(SpindexError::ClosedIndex)
        ));
        assert!(matches!(
            reader.document(DocId(0)),
            Err(SpindexError::ClosedIndex)
        ));
    }

    #[test]
    fn test_snapshot_isolation() {
        let dir = build_directory();
        let reader = IndexReader::open(&dir).unwrap();

        let mut writer = IndexWriter::open(&dir, OpenMode::Append).unwrap();
        writer.add_document(vec![("text", "should should")]).unwrap();
        writer.close().unwrap();

        assert_eq!(reader.num_docs().unwrap(), 2);
        assert_eq!(reader.doc_freq(&Term::new("text", "should")).unwrap(), 1);

        let fresh = IndexReader::open(&dir).unwrap();
        assert_eq!(fresh.num_docs().unwrap(), 3);
        assert_eq!(fresh.doc_freq(&Term::new("text", "should")).unwrap(), 2);
    }
}
