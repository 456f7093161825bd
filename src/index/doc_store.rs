//! Stored documents and their liveness

use roaring::RoaringBitmap;
use std::sync::Arc;

use super::types::DocId;
use crate::models::{Document, StoredDocument};

/// Dense doc id → stored document mapping with a delete bitset
#[derive(Clone, Debug, Default)]
pub struct DocStore {
    docs: Vec<Arc<Document>>,
    deleted: RoaringBitmap,
}

impl DocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document and return its doc id
    pub fn add(&mut self, doc: Document) -> DocId {
        let doc_id = DocId::new(self.docs.len() as u32);
        self.docs.push(Arc::new(doc));
        doc_id
    }

    /// Append a document that already has an id; ids must stay dense.
    pub(crate) fn push(&mut self, doc_id: DocId, doc: Arc<Document>) {
        debug_assert_eq!(doc_id.as_usize(), self.docs.len());
        self.docs.push(doc);
    }

    /// Mark a document deleted. Returns false if it does not exist or was
    /// already deleted.
    pub fn delete(&mut self, doc_id: DocId) -> bool {
        doc_id.as_usize() < self.docs.len() && self.deleted.insert(doc_id.as_u32())
    }

    pub fn is_deleted(&self, doc_id: DocId) -> bool {
        self.deleted.contains(doc_id.as_u32())
    }

    /// Exists and not deleted
    pub fn is_live(&self, doc_id: DocId) -> bool {
        doc_id.as_usize() < self.docs.len() && !self.is_deleted(doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> Option<StoredDocument> {
        self.docs.get(doc_id.as_usize()).map(|doc| StoredDocument {
            doc_id,
            document: doc.as_ref().clone(),
            live: !self.is_deleted(doc_id),
        })
    }

    pub(crate) fn get_arc(&self, doc_id: DocId) -> Option<&Arc<Document>> {
        self.docs.get(doc_id.as_usize())
    }

    /// Number of doc ids ever assigned
    pub fn max_doc(&self) -> u32 {
        self.docs.len() as u32
    }

    pub fn live_count(&self) -> u32 {
        self.max_doc() - self.deleted.len() as u32
    }

    pub fn deleted(&self) -> &RoaringBitmap {
        &self.deleted
    }

    /// Live doc ids in ascending order
    pub fn live_docs(&self) -> impl Iterator<Item = DocId> + '_ {
        (0..self.max_doc())
            .map(DocId::new)
            .filter(move |&d| !self.is_deleted(d))
    }
}
