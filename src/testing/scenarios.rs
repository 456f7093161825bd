//! Named, seeded test scenarios
//!
//! A `ScenarioRunner` holds scenario functions by name. Every run gets a
//! fresh `ScenarioContext` seeded from the runner's seed, so a scenario
//! behaves the same regardless of which scenarios ran before it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use super::assertions::{check_hits, HitsMismatch};
use super::fixtures::{
    baseline_corpus, spans_advanced_corpus, FIELD_ID, FIELD_TEXT, RANDOM_VOCABULARY,
};
use crate::error::SpindexError;
use crate::index::Term;
use crate::models::DocId;
use crate::query::{execute, BoolQuery, Searcher, SpanTermQuery, TermQuery};

/// Seeded state handed to each scenario
#[derive(Debug)]
pub struct ScenarioContext {
    seed: u64,
    rng: StdRng,
}

impl ScenarioContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Index(#[from] SpindexError),

    #[error(transparent)]
    Hits(#[from] HitsMismatch),

    #[error("{0}")]
    Failed(String),

    #[error("unknown scenario: {0}")]
    Unknown(String),
}

pub type ScenarioResult = Result<(), ScenarioError>;

pub type ScenarioFn = fn(&mut ScenarioContext) -> ScenarioResult;

/// Fail the scenario with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> ScenarioResult {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Failed(message()))
    }
}

/// Result of one scenario run
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub seed: u64,
    pub elapsed: Duration,
    pub result: ScenarioResult,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "{} (seed {}): ok", self.name, self.seed),
            Err(e) => write!(f, "{} (seed {}): FAILED: {}", self.name, self.seed, e),
        }
    }
}

/// Registry of scenarios run against one seed
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    seed: u64,
    scenarios: Vec<(&'static str, ScenarioFn)>,
}

impl ScenarioRunner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            scenarios: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Register `scenario` under `name`, replacing an earlier one with the
    /// same name
    pub fn register(&mut self, name: &'static str, scenario: ScenarioFn) -> &mut Self {
        match self.scenarios.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = scenario,
            None => self.scenarios.push((name, scenario)),
        }
        self
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(|(name, _)| *name).collect()
    }

    pub fn run(&self, name: &str) -> ScenarioResult {
        let (name, scenario) = self
            .scenarios
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| ScenarioError::Unknown(name.to_string()))?;
        self.run_one(*name, *scenario).result
    }

    pub fn run_all(&self) -> Vec<ScenarioOutcome> {
        self.scenarios
            .iter()
            .map(|(name, scenario)| self.run_one(*name, *scenario))
            .collect()
    }

    fn run_one(&self, name: &'static str, scenario: ScenarioFn) -> ScenarioOutcome {
        let start = Instant::now();
        let mut ctx = ScenarioContext::new(self.seed);
        let result = scenario(&mut ctx);
        let outcome = ScenarioOutcome {
            name,
            seed: self.seed,
            elapsed: start.elapsed(),
            result,
        };

        match &outcome.result {
            Ok(()) => info!(scenario = name, seed = self.seed, "scenario passed"),
            Err(e) => warn!(scenario = name, seed = self.seed, error = %e, "scenario failed"),
        }
        outcome
    }
}

/// Runner preloaded with the span query scenarios
pub fn span_scenarios(seed: u64) -> ScenarioRunner {
    let mut runner = ScenarioRunner::new(seed);
    runner
        .register("verify_index", verify_index)
        .register("single_span_query", single_span_query)
        .register("multiple_different_span_queries", multiple_different_span_queries)
        .register("boolean_query_with_span_queries", boolean_query_with_span_queries)
        .register("repeated_span_query", repeated_span_query)
        .register("empty_boolean_query", empty_boolean_query)
        .register("randomized_idempotence", randomized_idempotence);
    runner
}

/// Eight documents in two sessions, ids assigned in insertion order
pub fn verify_index(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let reader = spans_advanced_corpus()?.reader()?;

    let num_docs = reader.num_docs()?;
    ensure(num_docs == 8, || format!("expected 8 documents, found {num_docs}"))?;

    for (doc, id) in [(0, "1"), (3, "4"), (4, "A"), (7, "D")] {
        let stored = reader.stored_value(DocId(doc), FIELD_ID)?;
        ensure(stored.as_deref() == Some(id), || {
            format!("doc {doc} should have id {id}, found {stored:?}")
        })?;
    }
    Ok(())
}

/// "should" matches everything except C
pub fn single_span_query(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let reader = spans_advanced_corpus()?.reader()?;
    let hits = execute(&SpanTermQuery::new(FIELD_TEXT, "should"), &reader, 10)?;

    check_hits(
        &reader,
        &hits,
        &["B", "D", "1", "2", "3", "4", "A"],
        &[1.0, 0.70710677, 0.5, 0.5, 0.5, 0.5, 0.4082483],
    )?;
    Ok(())
}

/// "should" AND "we" matches only A and D
pub fn multiple_different_span_queries(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let reader = spans_advanced_corpus()?.reader()?;
    let query = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "should"))
        .must(SpanTermQuery::new(FIELD_TEXT, "we"));
    let hits = execute(&query, &reader, 10)?;

    check_hits(&reader, &hits, &["D", "A"], &[0.949897, 0.815212])?;
    Ok(())
}

/// "should" OR "we": coord halves the score of single-clause matches
pub fn boolean_query_with_span_queries(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let reader = spans_advanced_corpus()?.reader()?;
    let query = BoolQuery::new()
        .should(SpanTermQuery::new(FIELD_TEXT, "should"))
        .should(SpanTermQuery::new(FIELD_TEXT, "we"));
    let hits = execute(&query, &reader, 10)?;

    check_hits(
        &reader,
        &hits,
        &["D", "A", "B", "1", "2", "3", "4"],
        &[0.949897, 0.815212, 0.225333, 0.112667, 0.112667, 0.112667, 0.112667],
    )?;
    Ok(())
}

/// The same span query required twice scores every baseline document equally,
/// before and after the second session
pub fn repeated_span_query(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let query = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "work"))
        .must(SpanTermQuery::new(FIELD_TEXT, "work"));
    let expected_scores = [std::f32::consts::FRAC_1_SQRT_2; 4];

    let baseline = baseline_corpus()?;
    let reader = baseline.reader()?;
    let hits = execute(&query, &reader, 10)?;
    check_hits(&reader, &hits, &["1", "2", "3", "4"], &expected_scores)?;

    let advanced = baseline.spans_advanced()?;
    let reader = advanced.reader()?;
    let hits = execute(&query, &reader, 10)?;
    check_hits(&reader, &hits, &["1", "2", "3", "4"], &expected_scores)?;
    Ok(())
}

/// A boolean query without clauses cannot be evaluated
pub fn empty_boolean_query(_ctx: &mut ScenarioContext) -> ScenarioResult {
    let reader = spans_advanced_corpus()?.reader()?;
    match execute(&BoolQuery::new(), &reader, 10) {
        Err(SpindexError::EmptyQuery) => Ok(()),
        Err(e) => Err(e.into()),
        Ok(hits) => Err(ScenarioError::Failed(format!(
            "empty boolean query returned {} hits",
            hits.len()
        ))),
    }
}

/// Seeded random corpus: repeated searches agree bit for bit, scores never
/// increase down the ranking, and hit counts equal document frequencies
pub fn randomized_idempotence(ctx: &mut ScenarioContext) -> ScenarioResult {
    let corpus = spans_advanced_corpus()?.random_documents(ctx.seed(), 64, &RANDOM_VOCABULARY)?;
    let reader = corpus.reader()?;
    let searcher = Searcher::new(&reader);

    for _ in 0..8 {
        let word = RANDOM_VOCABULARY
            .choose(ctx.rng())
            .copied()
            .unwrap_or("should");
        let query = TermQuery::new(FIELD_TEXT, word);

        let first = searcher.search(&query, 100)?;
        let second = searcher.search(&query, 100)?;
        ensure(first == second, || format!("{word}: repeated search differs"))?;

        let doc_freq = reader.doc_freq(&Term::new(FIELD_TEXT, word))? as usize;
        ensure(first.total_hits == doc_freq, || {
            format!("{word}: {} hits but doc freq {doc_freq}", first.total_hits)
        })?;

        let ordered = first.hits.windows(2).all(|w| {
            w[0].score > w[1].score || (w[0].score == w[1].score && w[0].doc < w[1].doc)
        });
        ensure(ordered, || format!("{word}: hits out of rank order"))?;
    }
    Ok(())
}
