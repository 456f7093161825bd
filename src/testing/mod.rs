//! Test support shared by unit tests, integration tests and benchmarks
//!
//! - [`fixtures`]: layered corpora built through real writer sessions
//! - [`assertions`]: ranked-hit comparison by stored id and score
//! - [`scenarios`]: named scenarios run with an explicit seed
//!
//! # Quick Start
//!
//! ```
//! use spindex::query::{execute, SpanTermQuery};
//! use spindex::testing::prelude::*;
//!
//! let corpus = spans_advanced_corpus().unwrap();
//! let reader = corpus.reader().unwrap();
//! let hits = execute(&SpanTermQuery::new(FIELD_TEXT, "we"), &reader, 10).unwrap();
//! // equal scores rank by ascending doc id
//! assert_hits(&reader, &hits, &["A", "D"], &[]);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod scenarios;

pub use assertions::{assert_hits, check_hits, hit_ids, HitsMismatch, SCORE_TOLERANCE};
pub use fixtures::{
    baseline_corpus, fixture_document, spans_advanced_corpus, CorpusBuilder, FIELD_ID, FIELD_TEXT,
};
pub use scenarios::{
    span_scenarios, ScenarioContext, ScenarioError, ScenarioOutcome, ScenarioRunner,
};

/// Prelude for easy imports
pub mod prelude {
    pub use super::assertions::{assert_hits, check_hits, SCORE_TOLERANCE};
    pub use super::fixtures::*;
    pub use super::scenarios::{span_scenarios, ScenarioContext, ScenarioRunner};
}
