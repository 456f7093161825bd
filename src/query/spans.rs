//! Positional spans
//!
//! A span is a half-open position interval `[start, end)` inside one
//! document. Spans are enumerated ordered by doc id, then by start.

use serde::{Deserialize, Serialize};

use super::scorer::{DocScorer, LeafWeight};
use crate::index::PostingCursor;
use crate::models::DocId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub doc: DocId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Positions between the span's ends
    pub fn distance(&self) -> u32 {
        self.end.saturating_sub(self.start).saturating_sub(1)
    }
}

/// Forward-only enumeration of spans
pub trait Spans {
    /// Next span, `None` once exhausted
    fn next_span(&mut self) -> Option<Span>;

    /// First remaining span whose doc id is >= `target`
    fn skip_to(&mut self, target: DocId) -> Option<Span>;

    /// Upper bound on the documents still to visit
    fn cost(&self) -> usize;
}

/// One span of width 1 per occurrence of a term
pub struct TermSpans<'a> {
    cursor: PostingCursor<'a>,
    position: usize,
}

impl<'a> TermSpans<'a> {
    pub fn new(cursor: PostingCursor<'a>) -> Self {
        Self {
            cursor,
            position: 0,
        }
    }
}

impl Spans for TermSpans<'_> {
    fn next_span(&mut self) -> Option<Span> {
        loop {
            let posting = self.cursor.current()?;
            if let Some(&start) = posting.positions.get(self.position) {
                self.position += 1;
                return Some(Span {
                    doc: posting.doc,
                    start,
                    end: start + 1,
                });
            }
            self.cursor.next_doc()?;
            self.position = 0;
        }
    }

    fn skip_to(&mut self, target: DocId) -> Option<Span> {
        if self.cursor.doc()? < target {
            self.cursor.advance(target)?;
            self.position = 0;
        }
        self.next_span()
    }

    fn cost(&self) -> usize {
        self.cursor.remaining()
    }
}

/// Scores documents by summing the sloppy frequency of their spans
pub struct SpanScorer<'a> {
    spans: Box<dyn Spans + 'a>,
    weight: LeafWeight<'a>,
    /// First span past the current document
    pending: Option<Span>,
    doc: Option<DocId>,
    freq: f32,
}

impl<'a> SpanScorer<'a> {
    pub fn new(mut spans: Box<dyn Spans + 'a>, weight: LeafWeight<'a>) -> Self {
        let pending = spans.next_span();
        let mut scorer = Self {
            spans,
            weight,
            pending,
            doc: None,
            freq: 0.0,
        };
        scorer.collect_doc();
        scorer
    }

    /// Consume every pending span of the next document
    fn collect_doc(&mut self) {
        let Some(first) = self.pending else {
            self.doc = None;
            self.freq = 0.0;
            return;
        };

        let similarity = self.weight.similarity();
        let mut freq = 0.0;
        let mut span = Some(first);
        while let Some(s) = span.filter(|s| s.doc == first.doc) {
            freq += similarity.sloppy_freq(s.distance());
            span = self.spans.next_span();
        }

        self.pending = span;
        self.doc = Some(first.doc);
        self.freq = freq;
    }
}

impl DocScorer for SpanScorer<'_> {
    fn doc(&self) -> Option<DocId> {
        self.doc
    }

    fn next_doc(&mut self) -> Option<DocId> {
        self.doc?;
        self.collect_doc();
        self.doc
    }

    fn advance(&mut self, target: DocId) -> Option<DocId> {
        let current = self.doc?;
        if current >= target {
            return Some(current);
        }
        if self.pending.is_some_and(|s| s.doc < target) {
            self.pending = self.spans.skip_to(target);
        }
        self.collect_doc();
        self.doc
    }

    fn freq(&self) -> f32 {
        self.freq
    }

    fn score(&self) -> f32 {
        match self.doc {
            Some(doc) => self.weight.score(doc, self.freq),
            None => 0.0,
        }
    }

    fn cost(&self) -> usize {
        self.spans.cost()
    }
}
