use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::similarity::NormEncoding;

/// Index settings configuration
///
/// Shared by every writer and reader opened on a [`crate::index::Directory`],
/// so indexing and querying always agree on tokenization and scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub tokenizer: TokenizerConfig,
    pub similarity: SimilaritySettings,
    /// Result limit used when a caller does not pass one
    pub default_limit: usize,
    /// Fail queries that name a field no document has indexed
    pub strict_fields: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            similarity: SimilaritySettings::default(),
            default_limit: 10,
            strict_fields: false,
        }
    }
}

impl IndexSettings {
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_norm_encoding(mut self, encoding: NormEncoding) -> Self {
        self.similarity.norm_encoding = encoding;
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    /// Parse settings from JSON. Missing keys take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Tokenizer configuration
///
/// The default policy splits on Unicode word boundaries, lower-cases, and
/// drops the classic English stop set. Dropped tokens do not take a position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            min_token_length: 1,
            max_token_length: 255,
        }
    }
}

/// Scoring configuration for the default similarity
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilaritySettings {
    pub norm_encoding: NormEncoding,
}
