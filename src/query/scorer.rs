//! Document cursors that drive query evaluation
//!
//! A `DocScorer` is positioned on its first matching document as soon as it
//! is built and only ever moves forward. `doc()` returns `None` once the
//! cursor is exhausted.

use tracing::trace;

use super::context::QueryContext;
use super::types::Occur;
use crate::error::Result;
use crate::index::{FieldLengths, PostingCursor};
use crate::models::DocId;
use crate::similarity::Similarity;

/// Forward-only cursor over matching documents with their scores
pub trait DocScorer {
    /// Current document, `None` once exhausted
    fn doc(&self) -> Option<DocId>;

    /// Move to the next matching document
    fn next_doc(&mut self) -> Option<DocId>;

    /// Move to the first matching document with id >= `target`.
    /// Never moves backwards.
    fn advance(&mut self, target: DocId) -> Option<DocId>;

    /// Match frequency of the current document
    fn freq(&self) -> f32;

    /// Score of the current document
    fn score(&self) -> f32;

    /// Upper bound on the documents this cursor can still visit
    fn cost(&self) -> usize;
}

/// Per-leaf scoring state: the boosted, normalized idf plus the field norms
#[derive(Clone, Copy)]
pub struct LeafWeight<'a> {
    weight: f32,
    lengths: Option<&'a FieldLengths>,
    similarity: &'a dyn Similarity,
}

impl<'a> LeafWeight<'a> {
    pub fn new(ctx: &QueryContext<'a>, field: &str, idf: f32, boost: f32) -> Result<Self> {
        Ok(Self {
            weight: idf * boost * ctx.query_norm(),
            lengths: ctx.field_lengths(field)?,
            similarity: ctx.similarity(),
        })
    }

    pub fn similarity(&self) -> &'a dyn Similarity {
        self.similarity
    }

    /// Score of `doc` given its match frequency
    pub fn score(&self, doc: DocId, freq: f32) -> f32 {
        let len = self.lengths.map_or(0, |l| l.get(doc));
        let norm = self.similarity.length_norm(len);
        self.similarity.term_weight(freq, self.weight, norm)
    }
}

/// Scores a single term's postings
pub struct TermScorer<'a> {
    cursor: PostingCursor<'a>,
    weight: LeafWeight<'a>,
}

impl<'a> TermScorer<'a> {
    pub fn new(cursor: PostingCursor<'a>, weight: LeafWeight<'a>) -> Self {
        Self { cursor, weight }
    }
}

impl DocScorer for TermScorer<'_> {
    fn doc(&self) -> Option<DocId> {
        self.cursor.doc()
    }

    fn next_doc(&mut self) -> Option<DocId> {
        self.cursor.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Option<DocId> {
        self.cursor.advance(target)
    }

    fn freq(&self) -> f32 {
        self.cursor
            .current()
            .map_or(0.0, |p| p.term_frequency as f32)
    }

    fn score(&self) -> f32 {
        match self.cursor.current() {
            Some(posting) => self.weight.score(posting.doc, posting.term_frequency as f32),
            None => 0.0,
        }
    }

    fn cost(&self) -> usize {
        self.cursor.remaining()
    }
}

/// Merge-join over the clauses of a boolean query
///
/// With required clauses the candidate is the doc id all of them agree on;
/// otherwise it is the smallest doc id among the optional clauses. A
/// candidate that any prohibited clause contains is skipped.
pub struct BooleanScorer<'a> {
    /// MUST and SHOULD clauses in clause order
    scoring: Vec<(Occur, Box<dyn DocScorer + 'a>)>,
    prohibited: Vec<Box<dyn DocScorer + 'a>>,
    has_required: bool,
    /// Coord factor indexed by overlap
    coords: Vec<f32>,
    boost: f32,
    doc: Option<DocId>,
    overlap: usize,
    score: f32,
}

impl<'a> BooleanScorer<'a> {
    /// `max_overlap` counts every MUST and SHOULD clause, including those
    /// whose scorer matched nothing.
    pub fn new(
        scoring: Vec<(Occur, Box<dyn DocScorer + 'a>)>,
        prohibited: Vec<Box<dyn DocScorer + 'a>>,
        max_overlap: usize,
        similarity: &dyn Similarity,
        boost: f32,
    ) -> Self {
        let has_required = scoring.iter().any(|(occur, _)| *occur == Occur::Must);
        let coords = (0..=max_overlap)
            .map(|overlap| similarity.coord(overlap, max_overlap))
            .collect();

        let mut scorer = Self {
            scoring,
            prohibited,
            has_required,
            coords,
            boost,
            doc: None,
            overlap: 0,
            score: 0.0,
        };
        scorer.find_match();
        scorer
    }

    /// Doc id every required clause is positioned on, leapfrogging as needed
    fn align_required(&mut self) -> Option<DocId> {
        let mut target = DocId(0);
        for (occur, scorer) in &self.scoring {
            if *occur == Occur::Must {
                target = target.max(scorer.doc()?);
            }
        }

        loop {
            let mut aligned = true;
            for (occur, scorer) in self.scoring.iter_mut() {
                if *occur != Occur::Must {
                    continue;
                }
                let mut doc = scorer.doc()?;
                if doc < target {
                    doc = scorer.advance(target)?;
                }
                if doc > target {
                    target = doc;
                    aligned = false;
                }
            }
            if aligned {
                return Some(target);
            }
        }
    }

    fn next_candidate(&mut self) -> Option<DocId> {
        if self.has_required {
            let candidate = self.align_required()?;
            for (occur, scorer) in self.scoring.iter_mut() {
                if *occur == Occur::Should && scorer.doc().is_some_and(|d| d < candidate) {
                    scorer.advance(candidate);
                }
            }
            Some(candidate)
        } else {
            self.scoring.iter().filter_map(|(_, s)| s.doc()).min()
        }
    }

    fn is_prohibited(&mut self, candidate: DocId) -> bool {
        self.prohibited.iter_mut().any(|scorer| {
            let doc = match scorer.doc() {
                Some(doc) if doc < candidate => scorer.advance(candidate),
                doc => doc,
            };
            doc == Some(candidate)
        })
    }

    /// Move every scoring clause sitting on `doc` past it
    fn step_past(&mut self, doc: DocId) {
        for (_, scorer) in self.scoring.iter_mut() {
            if scorer.doc() == Some(doc) {
                scorer.next_doc();
            }
        }
    }

    fn find_match(&mut self) {
        loop {
            let Some(candidate) = self.next_candidate() else {
                self.doc = None;
                self.overlap = 0;
                self.score = 0.0;
                return;
            };

            if self.is_prohibited(candidate) {
                trace!(doc = %candidate, "boolean candidate rejected by prohibited clause");
                self.step_past(candidate);
                continue;
            }

            let mut overlap = 0;
            let mut sum = 0.0f32;
            for (_, scorer) in &self.scoring {
                if scorer.doc() == Some(candidate) {
                    overlap += 1;
                    sum += scorer.score();
                }
            }

            self.doc = Some(candidate);
            self.overlap = overlap;
            self.score = self.coords[overlap] * sum * self.boost;
            return;
        }
    }
}

impl DocScorer for BooleanScorer<'_> {
    fn doc(&self) -> Option<DocId> {
        self.doc
    }

    fn next_doc(&mut self) -> Option<DocId> {
        let current = self.doc?;
        self.step_past(current);
        self.find_match();
        self.doc
    }

    fn advance(&mut self, target: DocId) -> Option<DocId> {
        let current = self.doc?;
        if current >= target {
            return Some(current);
        }
        for (_, scorer) in self.scoring.iter_mut() {
            if scorer.doc().is_some_and(|d| d < target) {
                scorer.advance(target);
            }
        }
        self.find_match();
        self.doc
    }

    fn freq(&self) -> f32 {
        self.overlap as f32
    }

    fn score(&self) -> f32 {
        self.score
    }

    fn cost(&self) -> usize {
        if self.has_required {
            self.scoring
                .iter()
                .filter(|(occur, _)| *occur == Occur::Must)
                .map(|(_, s)| s.cost())
                .min()
                .unwrap_or(0)
        } else {
            self.scoring.iter().map(|(_, s)| s.cost()).sum()
        }
    }
}
