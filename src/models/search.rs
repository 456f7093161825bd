use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};

use super::document::DocId;

/// A ranked hit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc: DocId,
    pub score: f32,
}

impl ScoredDoc {
    pub fn new(doc: DocId, score: f32) -> Self {
        Self { doc, score }
    }

    /// Key that orders better hits greater: higher score, then lower doc id
    pub(crate) fn rank_key(&self) -> (OrderedFloat<f32>, Reverse<DocId>) {
        (OrderedFloat(self.score), Reverse(self.doc))
    }

    /// Ranking order: descending score, ties ascending by doc id
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.rank_key().cmp(&self.rank_key())
    }
}

/// Result of a search: the requested prefix of the ranking
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopDocs {
    /// Number of documents that matched, before truncation
    pub total_hits: usize,
    pub max_score: Option<f32>,
    pub hits: Vec<ScoredDoc>,
}

impl TopDocs {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// First `n` hits (or fewer)
    pub fn top(&self, n: usize) -> &[ScoredDoc] {
        &self.hits[..n.min(self.hits.len())]
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|h| h.doc).collect()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.hits.iter().map(|h| h.score).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_cmp() {
        let high = ScoredDoc::new(DocId(5), 0.9);
        let low = ScoredDoc::new(DocId(1), 0.1);
        let tie = ScoredDoc::new(DocId(2), 0.9);

        assert_eq!(high.rank_cmp(&low), Ordering::Less);
        assert_eq!(tie.rank_cmp(&high), Ordering::Less);
        assert_eq!(high.rank_cmp(&high), Ordering::Equal);
    }

    #[test]
    fn test_top_prefix() {
        let top = TopDocs {
            total_hits: 3,
            max_score: Some(1.0),
            hits: vec![
                ScoredDoc::new(DocId(0), 1.0),
                ScoredDoc::new(DocId(1), 0.5),
            ],
        };

        assert_eq!(top.top(1).len(), 1);
        assert_eq!(top.top(10).len(), 2);
        assert_eq!(top.doc_ids(), vec![DocId(0), DocId(1)]);
        assert_eq!(top.scores(), vec![1.0, 0.5]);
    }
}
