//! Ranked-result assertions
//!
//! Hits are compared by the stored [`FIELD_ID`] of each document rather than
//! by doc id, and scores within [`SCORE_TOLERANCE`].

use thiserror::Error;

use super::fixtures::FIELD_ID;
use crate::error::SpindexError;
use crate::index::IndexReader;
use crate::models::{DocId, ScoredDoc};

/// Maximum absolute score difference accepted as equal
pub const SCORE_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Error)]
pub enum HitsMismatch {
    #[error("expected {expected} hits, got {actual}: {actual_ids:?}")]
    Count {
        expected: usize,
        actual: usize,
        actual_ids: Vec<String>,
    },

    #[error("hit {rank}: expected id {expected:?}, got {actual:?}")]
    Id {
        rank: usize,
        expected: String,
        actual: String,
    },

    #[error("hit {rank} ({id}): expected score {expected}, got {actual}")]
    Score {
        rank: usize,
        id: String,
        expected: f32,
        actual: f32,
    },

    #[error("{ids} expected ids but {scores} expected scores")]
    ScoreCount { ids: usize, scores: usize },

    #[error("hit {rank}: {doc} has no stored id field")]
    MissingId { rank: usize, doc: DocId },

    #[error(transparent)]
    Index(#[from] SpindexError),
}

/// Stored ids of `hits`, in rank order
pub fn hit_ids(reader: &IndexReader, hits: &[ScoredDoc]) -> Result<Vec<String>, HitsMismatch> {
    hits.iter()
        .enumerate()
        .map(|(rank, hit)| {
            reader
                .stored_value(hit.doc, FIELD_ID)?
                .ok_or(HitsMismatch::MissingId { rank, doc: hit.doc })
        })
        .collect()
}

/// Compare `hits` with the expected ids and, when `expected_scores` is not
/// empty, the parallel list of expected scores
pub fn check_hits(
    reader: &IndexReader,
    hits: &[ScoredDoc],
    expected_ids: &[&str],
    expected_scores: &[f32],
) -> Result<(), HitsMismatch> {
    if !expected_scores.is_empty() && expected_scores.len() != expected_ids.len() {
        return Err(HitsMismatch::ScoreCount {
            ids: expected_ids.len(),
            scores: expected_scores.len(),
        });
    }

    let actual_ids = hit_ids(reader, hits)?;
    if actual_ids.len() != expected_ids.len() {
        return Err(HitsMismatch::Count {
            expected: expected_ids.len(),
            actual: actual_ids.len(),
            actual_ids,
        });
    }

    for (rank, (actual, expected)) in actual_ids.iter().zip(expected_ids).enumerate() {
        if actual != expected {
            return Err(HitsMismatch::Id {
                rank,
                expected: expected.to_string(),
                actual: actual.clone(),
            });
        }
    }

    for (rank, (hit, &expected)) in hits.iter().zip(expected_scores).enumerate() {
        if (hit.score - expected).abs() > SCORE_TOLERANCE {
            return Err(HitsMismatch::Score {
                rank,
                id: actual_ids[rank].clone(),
                expected,
                actual: hit.score,
            });
        }
    }

    Ok(())
}

/// Panicking form of [`check_hits`]
#[track_caller]
pub fn assert_hits(
    reader: &IndexReader,
    hits: &[ScoredDoc],
    expected_ids: &[&str],
    expected_scores: &[f32],
) {
    if let Err(mismatch) = check_hits(reader, hits, expected_ids, expected_scores) {
        panic!("hits mismatch: {mismatch}");
    }
}
