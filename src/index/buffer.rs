//! Write buffer for one writer session
//!
//! Postings are accumulated per term in doc id order, so each in-progress
//! list stays sorted without a final sort. Nothing here is visible to
//! readers until `into_commit` produces a `Commit` and the writer publishes it.

use roaring::RoaringBitmap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::trace;

use super::directory::Commit;
use super::statistics::FieldStatistics;
use super::types::{DocId, Generation, Posting, Term};
use crate::models::{Document, FieldKind};
use crate::tokenizer::{Token, Tokenizer};

/// In-memory buffer of documents added during one writer session
#[derive(Debug)]
pub struct MutableBuffer {
    /// Committed state the session builds on (empty in create mode)
    base: Arc<Commit>,
    next_doc: DocId,
    /// Term to in-progress postings, ascending by doc id
    terms: HashMap<Term, Vec<Posting>>,
    docs: Vec<(DocId, Arc<Document>)>,
    field_stats: FieldStatistics,
    /// Docs deleted in this session, committed or buffered
    deleted: RoaringBitmap,
}

impl MutableBuffer {
    pub fn new(base: Arc<Commit>) -> Self {
        let next_doc = DocId::new(base.max_doc());
        Self {
            base,
            next_doc,
            terms: HashMap::new(),
            docs: Vec::new(),
            field_stats: FieldStatistics::new(),
            deleted: RoaringBitmap::new(),
        }
    }

    /// Index a document and return its doc id
    pub fn add(&mut self, doc: Document, tokenizer: &Tokenizer) -> DocId {
        let doc_id = self.next_doc;
        self.next_doc = doc_id.next();

        // Values of a repeated field continue one token stream
        let mut offsets: HashMap<&str, u32> = HashMap::new();

        for field in doc.fields() {
            let tokens = match field.kind {
                FieldKind::Text => tokenizer.tokenize(&field.value),
                FieldKind::Keyword if field.value.is_empty() => Vec::new(),
                FieldKind::Keyword => vec![Token::new(field.value.clone(), 0)],
                FieldKind::Stored => continue,
            };

            let offset = offsets.entry(field.name.as_str()).or_insert(0);
            for token in &tokens {
                let position = *offset + token.position;
                let postings = self
                    .terms
                    .entry(Term::new(field.name.as_str(), token.term.as_str()))
                    .or_default();
                match postings.last_mut() {
                    Some(last) if last.doc == doc_id => last.push_position(position),
                    _ => postings.push(Posting::new(doc_id, position)),
                }
            }

            let len = tokens.len() as u32;
            *offset += len;
            self.field_stats.record(doc_id, &field.name, len);
        }

        trace!(doc = doc_id.as_u32(), fields = doc.len(), "document buffered");
        self.docs.push((doc_id, Arc::new(doc)));
        doc_id
    }

    /// Mark a committed or buffered document deleted.
    ///
    /// Returns false when the doc id was never assigned or is already deleted.
    pub fn delete(&mut self, doc_id: DocId) -> bool {
        if doc_id >= self.next_doc {
            return false;
        }
        if doc_id.as_u32() < self.base.max_doc() && self.base.docs().is_deleted(doc_id) {
            return false;
        }
        self.deleted.insert(doc_id.as_u32())
    }

    /// Documents added in this session
    pub fn buffered_docs(&self) -> usize {
        self.docs.len()
    }

    /// Documents deleted in this session
    pub fn deleted_docs(&self) -> u64 {
        self.deleted.len()
    }

    pub fn next_doc(&self) -> DocId {
        self.next_doc
    }

    /// Finalize every postings list and build the next commit.
    ///
    /// Committed lists are shared with the base commit unless this session
    /// changed them; deleted documents are purged from postings and field
    /// statistics so every remaining posting points at a live document.
    pub fn into_commit(self, generation: Generation) -> Commit {
        let base = self.base;

        let mut docs = base.docs().clone();
        for (doc_id, doc) in self.docs {
            docs.push(doc_id, doc);
        }
        for doc_id in self.deleted.iter() {
            docs.delete(DocId::new(doc_id));
        }

        let mut field_stats = base.field_stats().clone();
        field_stats.merge(&self.field_stats);
        for doc_id in self.deleted.iter() {
            field_stats.remove_document(DocId::new(doc_id));
        }

        let purge_committed = self
            .deleted
            .min()
            .map_or(false, |min| min < base.max_doc());

        let mut postings: BTreeMap<Term, Arc<_>> = BTreeMap::new();
        for (term, list) in &base.postings {
            let list = if purge_committed {
                let pruned = list.without_deleted(&self.deleted);
                if pruned.is_empty() {
                    continue;
                }
                Arc::new(pruned)
            } else {
                Arc::clone(list)
            };
            postings.insert(term.clone(), list);
        }

        for (term, buffered) in self.terms {
            let list = postings.entry(term).or_default();
            Arc::make_mut(list).extend_sorted(buffered, &self.deleted);
        }
        postings.retain(|_, list| !list.is_empty());

        Commit {
            generation,
            postings,
            docs,
            field_stats,
        }
    }
}
