//! Scoring components for the vector-space ranking model
//!
//! A document's score for a boolean level is
//! `coord * Σ tf(freq) * idf * fieldNorm * boost * queryNorm`, where the
//! query norm is computed once per search from the leaf weights.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::config::SimilaritySettings;

/// How field norms are stored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormEncoding {
    /// Full f32 precision
    #[default]
    Exact,
    /// Quantized through the classic 8-bit float (3 mantissa bits,
    /// zero exponent 15), as older index formats stored norms
    SingleByte,
}

const MANTISSA_SHIFT: u32 = 24 - 3;
const ZERO_EXPONENT: u32 = (63 - 15) << 3;

/// Quantize a non-negative norm to one byte. Rounds down.
pub fn encode_norm(value: f32) -> u8 {
    let bits = value.to_bits() as i32;
    let small = bits >> MANTISSA_SHIFT;
    if small <= ZERO_EXPONENT as i32 {
        // zero, negatives and underflow
        return if bits <= 0 { 0 } else { 1 };
    }
    if small >= (ZERO_EXPONENT + 0x100) as i32 {
        return u8::MAX;
    }
    (small - ZERO_EXPONENT as i32) as u8
}

pub fn decode_norm(byte: u8) -> f32 {
    if byte == 0 {
        return 0.0;
    }
    let bits = ((byte as u32) << MANTISSA_SHIFT) + ((63 - 15) << 24);
    f32::from_bits(bits)
}

/// Scoring components plugged into query evaluation
pub trait Similarity: Send + Sync + Debug {
    /// Inverse document frequency of a term
    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32;

    /// Within-document frequency factor. `freq` is fractional for spans.
    fn tf(&self, freq: f32) -> f32;

    /// Normalization for a field holding `num_tokens` tokens
    fn length_norm(&self, num_tokens: u32) -> f32;

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32;

    /// Fraction of a boolean query's scoring clauses a document matched
    fn coord(&self, overlap: usize, max_overlap: usize) -> f32;

    /// Weight of a span match whose ends are `distance` positions apart
    fn sloppy_freq(&self, distance: u32) -> f32;

    fn term_weight(&self, freq: f32, idf: f32, norm: f32) -> f32 {
        self.tf(freq) * idf * norm
    }
}

/// Classic tf-idf similarity
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DefaultSimilarity {
    norm_encoding: NormEncoding,
}

impl DefaultSimilarity {
    pub fn new(norm_encoding: NormEncoding) -> Self {
        Self { norm_encoding }
    }

    pub fn from_settings(settings: &SimilaritySettings) -> Self {
        Self::new(settings.norm_encoding)
    }

    pub fn norm_encoding(&self) -> NormEncoding {
        self.norm_encoding
    }
}

impl Similarity for DefaultSimilarity {
    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32 {
        if num_docs == 0 {
            return 0.0;
        }
        1.0 + (num_docs as f32 / (doc_freq as f32 + 1.0)).ln()
    }

    fn tf(&self, freq: f32) -> f32 {
        freq.sqrt()
    }

    fn length_norm(&self, num_tokens: u32) -> f32 {
        if num_tokens == 0 {
            return 0.0;
        }
        let norm = 1.0 / (num_tokens as f32).sqrt();
        match self.norm_encoding {
            NormEncoding::Exact => norm,
            NormEncoding::SingleByte => decode_norm(encode_norm(norm)),
        }
    }

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32 {
        if sum_of_squared_weights <= 0.0 {
            1.0
        } else {
            1.0 / sum_of_squared_weights.sqrt()
        }
    }

    fn coord(&self, overlap: usize, max_overlap: usize) -> f32 {
        if max_overlap == 0 {
            0.0
        } else {
            overlap as f32 / max_overlap as f32
        }
    }

    fn sloppy_freq(&self, distance: u32) -> f32 {
        1.0 / (distance as f32 + 1.0)
    }
}
