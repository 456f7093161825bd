use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;

/// The classic English stop set used by standard analyzers.
pub const CLASSIC_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// A single emitted token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    /// Zero-based, incremented once per emitted token
    pub position: u32,
}

impl Token {
    pub fn new(term: impl Into<String>, position: u32) -> Self {
        Self {
            term: term.into(),
            position,
        }
    }
}

/// Text tokenizer with lower-casing and stop-word removal
///
/// Words are split on Unicode word boundaries (UAX #29), so contractions
/// such as `shouldn't` stay whole and never match `should`.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    config: TokenizerConfig,
    stopwords: HashSet<&'static str>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stopwords = if config.remove_stopwords {
            CLASSIC_STOP_WORDS.iter().copied().collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize text into `(term, position)` pairs in order.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for word in text.unicode_words() {
            let term = if self.config.lowercase {
                word.to_lowercase()
            } else {
                word.to_string()
            };

            let len = term.chars().count();
            if len < self.config.min_token_length || len > self.config.max_token_length {
                continue;
            }

            if self.stopwords.contains(term.as_str()) {
                continue;
            }

            tokens.push(Token::new(term, position));
            position += 1;
        }

        tokens
    }

    /// Tokenize and return only the terms, in order
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.term).collect()
    }

    /// Normalize a single query term the same way indexed text is normalized.
    ///
    /// Returns `None` when the term would be dropped at index time.
    pub fn normalize(&self, term: &str) -> Option<String> {
        self.tokenize(term).into_iter().next().map(|t| t.term)
    }
}
