//! Top-k hit collection

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::models::{DocId, ScoredDoc, TopDocs};

type RankKey = (OrderedFloat<f32>, Reverse<DocId>);

/// Keeps the `limit` best hits seen so far
///
/// Hits rank by descending score, ties broken by ascending doc id, so the
/// outcome does not depend on collection order.
#[derive(Debug)]
pub struct TopDocsCollector {
    limit: usize,
    /// Min-heap: the worst retained hit sits on top
    heap: BinaryHeap<Reverse<RankKey>>,
    total_hits: usize,
    max_score: Option<f32>,
}

impl TopDocsCollector {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            heap: BinaryHeap::with_capacity(limit.min(1024) + 1),
            total_hits: 0,
            max_score: None,
        }
    }

    pub fn collect(&mut self, doc: DocId, score: f32) {
        self.total_hits += 1;
        self.max_score = Some(self.max_score.map_or(score, |max| max.max(score)));

        if self.limit == 0 {
            return;
        }
        let key = ScoredDoc::new(doc, score).rank_key();
        if self.heap.len() < self.limit {
            self.heap.push(Reverse(key));
        } else if let Some(Reverse(worst)) = self.heap.peek() {
            if key > *worst {
                self.heap.pop();
                self.heap.push(Reverse(key));
            }
        }
    }

    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// Retained hits, best first
    pub fn top_docs(self) -> TopDocs {
        let mut hits: Vec<ScoredDoc> = self
            .heap
            .into_iter()
            .map(|Reverse((OrderedFloat(score), Reverse(doc)))| ScoredDoc::new(doc, score))
            .collect();
        hits.sort_by(ScoredDoc::rank_cmp);

        TopDocs {
            total_hits: self.total_hits,
            max_score: self.max_score,
            hits,
        }
    }
}
