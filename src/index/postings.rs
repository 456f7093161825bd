//! Posting lists and cursors
//!
//! A `PostingsList` is sorted ascending by doc id with no duplicates. Query
//! evaluation walks it with a `PostingCursor`, which supports the forward
//! `next` / `advance(target)` moves a merge-join needs.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use super::types::{DocId, Posting};

/// All postings for one term, sorted by doc id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingsList {
    postings: Vec<Posting>,
}

impl PostingsList {
    pub fn new() -> Self {
        Self {
            postings: Vec::new(),
        }
    }

    /// Build a list from postings in any order.
    ///
    /// Postings for the same doc id are merged (positions combined and
    /// re-sorted), so the result keeps the list invariants.
    pub fn from_postings(mut postings: Vec<Posting>) -> Self {
        postings.sort_by_key(|p| p.doc);

        let mut merged: Vec<Posting> = Vec::with_capacity(postings.len());
        for posting in postings {
            match merged.last_mut() {
                Some(last) if last.doc == posting.doc => {
                    last.positions.extend(posting.positions);
                    last.positions.sort_unstable();
                    last.positions.dedup();
                    last.term_frequency = last.positions.len() as u32;
                }
                _ => merged.push(posting),
            }
        }

        Self { postings: merged }
    }

    /// Number of documents containing the term
    pub fn doc_freq(&self) -> u32 {
        self.postings.len() as u32
    }

    /// Sum of term frequencies across all documents
    pub fn total_term_frequency(&self) -> u64 {
        self.postings.iter().map(|p| p.term_frequency as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn as_slice(&self) -> &[Posting] {
        &self.postings
    }

    /// Posting for `doc`, if the term occurs there
    pub fn get(&self, doc: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc, |p| p.doc)
            .ok()
            .map(|idx| &self.postings[idx])
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        self.postings.iter().map(|p| p.doc).collect()
    }

    pub fn cursor(&self) -> PostingCursor<'_> {
        PostingCursor::new(&self.postings)
    }

    /// Append postings whose doc ids are all greater than this list's last
    /// doc id, dropping any doc in `deleted`.
    pub(crate) fn extend_sorted(&mut self, postings: Vec<Posting>, deleted: &RoaringBitmap) {
        debug_assert!(postings.windows(2).all(|w| w[0].doc < w[1].doc));
        debug_assert!(match (self.postings.last(), postings.first()) {
            (Some(last), Some(first)) => last.doc < first.doc,
            _ => true,
        });
        self.postings.extend(
            postings
                .into_iter()
                .filter(|p| !deleted.contains(p.doc.as_u32())),
        );
    }

    /// Copy of this list without the postings of deleted documents
    pub(crate) fn without_deleted(&self, deleted: &RoaringBitmap) -> Self {
        Self {
            postings: self
                .postings
                .iter()
                .filter(|p| !deleted.contains(p.doc.as_u32()))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PostingsList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}

/// Forward-only cursor over a posting list
///
/// A fresh cursor is positioned on the first posting. `current()` returns
/// `None` once the list is exhausted.
#[derive(Clone, Debug)]
pub struct PostingCursor<'a> {
    postings: &'a [Posting],
    idx: usize,
}

impl<'a> PostingCursor<'a> {
    pub fn new(postings: &'a [Posting]) -> Self {
        Self { postings, idx: 0 }
    }

    pub fn current(&self) -> Option<&'a Posting> {
        self.postings.get(self.idx)
    }

    pub fn doc(&self) -> Option<DocId> {
        self.current().map(|p| p.doc)
    }

    /// Move to the next posting
    pub fn next_doc(&mut self) -> Option<DocId> {
        if self.idx < self.postings.len() {
            self.idx += 1;
        }
        self.doc()
    }

    /// Move to the first posting with doc id >= `target`. Never moves back.
    pub fn advance(&mut self, target: DocId) -> Option<DocId> {
        let rest = &self.postings[self.idx..];
        self.idx += rest.partition_point(|p| p.doc < target);
        self.doc()
    }

    /// Number of postings not yet consumed, including the current one
    pub fn remaining(&self) -> usize {
        self.postings.len() - self.idx.min(self.postings.len())
    }
}
