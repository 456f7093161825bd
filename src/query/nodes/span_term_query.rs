//! Span term query - a term query that also exposes match positions

use serde::{Deserialize, Serialize};

use super::term_query::default_boost;
use crate::index::Term;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::query::scorer::{DocScorer, LeafWeight};
use crate::query::spans::{SpanScorer, Spans, TermSpans};
use crate::Result;

/// Queries that can enumerate their matches as position spans
pub trait SpanQuery: QueryNode {
    /// Field the spans come from
    fn field(&self) -> &str;

    /// Spans of every match, ordered by doc id then start position
    fn spans<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn Spans + 'a>>>;
}

/// Matches a single term and yields one span per occurrence
///
/// Matching and scoring agree with [`super::TermQuery`]: each occurrence
/// contributes `sloppy_freq(0) = 1` to the frequency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanTermQuery {
    pub field: String,
    pub term: String,
    #[serde(default = "default_boost")]
    pub boost: f32,
}

impl SpanTermQuery {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn term(&self) -> Term {
        Term::new(self.field.as_str(), self.term.as_str())
    }
}

impl SpanQuery for SpanTermQuery {
    fn field(&self) -> &str {
        &self.field
    }

    fn spans<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn Spans + 'a>>> {
        let spans = ctx
            .postings(&self.term())?
            .map(|postings| Box::new(TermSpans::new(postings.cursor())) as Box<dyn Spans + 'a>);
        Ok(spans)
    }
}

impl QueryNode for SpanTermQuery {
    fn scorer<'a>(&self, ctx: &QueryContext<'a>) -> Result<Option<Box<dyn DocScorer + 'a>>> {
        let Some(spans) = self.spans(ctx)? else {
            return Ok(None);
        };
        let weight = LeafWeight::new(ctx, &self.field, ctx.idf(&self.term())?, self.boost)?;
        Ok(Some(Box::new(SpanScorer::new(spans, weight))))
    }

    fn sum_of_squared_weights(&self, ctx: &QueryContext<'_>) -> Result<f32> {
        let weight = ctx.idf(&self.term())? * self.boost;
        Ok(weight * weight)
    }

    fn query_type(&self) -> &'static str {
        "span_term"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Directory, IndexReader, IndexWriter, OpenMode};
    use crate::models::DocId;
    use crate::query::nodes::TermQuery;
    use crate::similarity::DefaultSimilarity;

    fn reader() -> IndexReader {
        let dir = Directory::default();
        let mut writer = IndexWriter::open(&dir, OpenMode::Create).unwrap();
        writer.add_document(vec![("text", "Should we, should we?")]).unwrap();
        writer.add_document(vec![("text", "It shouldn't.")]).unwrap();
        writer.add_document(vec![("text", "I think it should work.")]).unwrap();
        writer.close().unwrap();
        IndexReader::open(&dir).unwrap()
    }

    #[test]
    fn test_spans_positions() {
        let reader = reader();
        let sim = DefaultSimilarity::default();
        let ctx = QueryContext::new(&reader, &sim);
        let query = SpanTermQuery::new("text", "should");

        let mut spans = query.spans(&ctx).unwrap().unwrap();
        let mut seen = Vec::new();
        while let Some(span) = spans.next_span() {
            seen.push((span.doc, span.start, span.end));
        }
        assert_eq!(
            seen,
            vec![
                (DocId(0), 0, 1),
                (DocId(0), 2, 3),
                (DocId(2), 2, 3),
            ]
        );
    }

    #[test]
    fn test_matches_term_query() {
        let reader = reader();
        let sim = DefaultSimilarity::default();
        let ctx = QueryContext::new(&reader, &sim);

        let mut span = SpanTermQuery::new("text", "should").scorer(&ctx).unwrap().unwrap();
        let mut term = TermQuery::new("text", "should").scorer(&ctx).unwrap().unwrap();

        while let Some(doc) = term.doc() {
            assert_eq!(span.doc(), Some(doc));
            assert_eq!(span.freq(), term.freq());
            assert!((span.score() - term.score()).abs() < 1e-6);
            term.next_doc();
            span.next_doc();
        }
        assert_eq!(span.doc(), None);
    }

    #[test]
    fn test_span_scorer_advance() {
        let reader = reader();
        let sim = DefaultSimilarity::default();
        let ctx = QueryContext::new(&reader, &sim);

        let mut scorer = SpanTermQuery::new("text", "should").scorer(&ctx).unwrap().unwrap();
        assert_eq!(scorer.advance(DocId(1)), Some(DocId(2)));
        assert_eq!(scorer.freq(), 1.0);
        assert_eq!(scorer.advance(DocId(3)), None);
    }

    #[test]
    fn test_absent_term() {
        let reader = reader();
        let sim = DefaultSimilarity::default();
        let ctx = QueryContext::new(&reader, &sim);
        let query = SpanTermQuery::new("text", "could");

        assert!(query.spans(&ctx).unwrap().is_none());
        assert!(query.scorer(&ctx).unwrap().is_none());
        assert_eq!(query.query_type(), "span_term");
        assert_eq!(SpanQuery::field(&query), "text");
    }
}
