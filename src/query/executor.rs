//! Query executor for running queries against a reader snapshot

use std::fmt;
use std::time::Instant;
use tracing::debug;

use super::ast::QueryNode;
use super::collector::TopDocsCollector;
use super::context::QueryContext;
use super::scorer::DocScorer;
use super::types::QueryStats;
use crate::index::IndexReader;
use crate::models::{ScoredDoc, TopDocs};
use crate::similarity::{DefaultSimilarity, Similarity};
use crate::Result;

/// Runs queries against one reader snapshot
///
/// The similarity and field strictness default to the reader's settings.
/// Searching the same snapshot twice yields identical results.
pub struct Searcher<'r> {
    reader: &'r IndexReader,
    similarity: Box<dyn Similarity>,
    strict_fields: bool,
}

impl<'r> Searcher<'r> {
    pub fn new(reader: &'r IndexReader) -> Self {
        let settings = reader.settings();
        Self {
            reader,
            similarity: Box::new(DefaultSimilarity::from_settings(&settings.similarity)),
            strict_fields: settings.strict_fields,
        }
    }

    /// Replace the similarity used for scoring
    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn with_strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    pub fn reader(&self) -> &'r IndexReader {
        self.reader
    }

    pub fn similarity(&self) -> &dyn Similarity {
        self.similarity.as_ref()
    }

    /// Best `limit` hits for `query`
    pub fn search(&self, query: &dyn QueryNode, limit: usize) -> Result<TopDocs> {
        self.search_with_stats(query, limit).map(|(top, _)| top)
    }

    /// Search with the limit from the index settings
    pub fn search_default(&self, query: &dyn QueryNode) -> Result<TopDocs> {
        self.search(query, self.reader.settings().default_limit)
    }

    /// Number of documents matching `query`
    pub fn count(&self, query: &dyn QueryNode) -> Result<usize> {
        self.search_with_stats(query, 0).map(|(top, _)| top.total_hits)
    }

    pub fn search_with_stats(
        &self,
        query: &dyn QueryNode,
        limit: usize,
    ) -> Result<(TopDocs, QueryStats)> {
        let start = Instant::now();
        let generation = self.reader.generation()?;

        let ctx = QueryContext::new(self.reader, self.similarity.as_ref())
            .with_strict_fields(self.strict_fields);
        let query_norm = self
            .similarity
            .query_norm(query.sum_of_squared_weights(&ctx)?);
        let ctx = ctx.with_query_norm(query_norm);

        let mut collector = TopDocsCollector::new(limit);
        if let Some(mut scorer) = query.scorer(&ctx)? {
            while let Some(doc) = scorer.doc() {
                collector.collect(doc, scorer.score());
                scorer.next_doc();
            }
        }
        let top = collector.top_docs();

        let stats = QueryStats {
            docs_matched: top.total_hits as u64,
            docs_returned: top.len(),
            query_norm,
            execution_time_us: start.elapsed().as_micros() as u64,
        };
        debug!(
            query_type = query.query_type(),
            generation,
            limit,
            docs_matched = stats.docs_matched,
            docs_returned = stats.docs_returned,
            query_norm = stats.query_norm,
            elapsed_us = stats.execution_time_us,
            "search completed"
        );

        Ok((top, stats))
    }
}

impl fmt::Debug for Searcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("similarity", &self.similarity)
            .field("strict_fields", &self.strict_fields)
            .finish_non_exhaustive()
    }
}

/// Run `query` with the reader's default similarity and return the ranked
/// hits, best first
pub fn execute(query: &dyn QueryNode, reader: &IndexReader, limit: usize) -> Result<Vec<ScoredDoc>> {
    Ok(Searcher::new(reader).search(query, limit)?.hits)
}
