//! Corpus fixtures shared by unit tests, integration tests and benchmarks
//!
//! Corpora are layered: `baseline()` creates the index with four identical
//! documents, and `spans_advanced()` appends four more in a second writer
//! session. Doc ids follow insertion order, so the baseline documents are
//! 0..=3 and A..D are 4..=7.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::IndexSettings;
use crate::error::{Result, SpindexError};
use crate::index::{CommitInfo, Directory, IndexReader, IndexWriter, OpenMode};
use crate::models::Document;

/// Stored, un-tokenized identifier field
pub const FIELD_ID: &str = "id";
/// Tokenized body field
pub const FIELD_TEXT: &str = "text";

pub const BASELINE_TEXT: &str = "I think it should work.";

/// Ids of the baseline documents, in insertion order
pub const BASELINE_IDS: [&str; 4] = ["1", "2", "3", "4"];

/// Documents appended by `spans_advanced`, in insertion order
pub const SPANS_ADVANCED_DOCS: [(&str, &str); 4] = [
    ("A", "Should we, could we, would we?"),
    ("B", "It should.  Should it?"),
    ("C", "It shouldn't."),
    ("D", "Should we, should we, should we."),
];

/// Words used for generated documents
pub const RANDOM_VOCABULARY: [&str; 12] = [
    "should", "we", "could", "would", "work", "think", "index", "query", "span", "term",
    "score", "rank",
];

/// Document with the fixture's id and text fields
pub fn fixture_document(id: impl Into<String>, text: impl Into<String>) -> Document {
    Document::new().keyword(FIELD_ID, id).text(FIELD_TEXT, text)
}

/// Builds an in-memory corpus one writer session at a time
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    directory: Directory,
    sessions: Vec<CommitInfo>,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::with_settings(IndexSettings::default())
    }

    pub fn with_settings(settings: IndexSettings) -> Self {
        Self {
            directory: Directory::new(settings),
            sessions: Vec::new(),
        }
    }

    /// Run one writer session that adds `docs` as (id, text) pairs
    pub fn session<I, S, T>(mut self, mode: OpenMode, docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut writer = IndexWriter::open(&self.directory, mode)?;
        for (id, text) in docs {
            writer.add_document(fixture_document(id, text))?;
        }
        let info = writer.close()?;
        debug!(generation = info.generation, docs = info.docs_added, "fixture session committed");
        self.sessions.push(info);
        Ok(self)
    }

    /// Create the index with four copies of [`BASELINE_TEXT`]
    pub fn baseline(self) -> Result<Self> {
        self.session(
            OpenMode::Create,
            BASELINE_IDS.iter().map(|id| (*id, BASELINE_TEXT)),
        )
    }

    /// Append documents A..D in a new session
    pub fn spans_advanced(self) -> Result<Self> {
        self.session(OpenMode::Append, SPANS_ADVANCED_DOCS)
    }

    /// Append `count` documents drawn from `vocabulary`, ids `r0`, `r1`, ...
    ///
    /// The same seed always yields the same documents.
    pub fn random_documents(self, seed: u64, count: usize, vocabulary: &[&str]) -> Result<Self> {
        if vocabulary.is_empty() {
            return Err(SpindexError::InvalidRequest(
                "random documents need a non-empty vocabulary".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut docs = Vec::with_capacity(count);
        for i in 0..count {
            let len = rng.gen_range(1..=12);
            let words: Vec<&str> = (0..len)
                .filter_map(|_| vocabulary.choose(&mut rng).copied())
                .collect();
            docs.push((format!("r{i}"), words.join(" ")));
        }
        self.session(OpenMode::Append, docs)
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Commits made so far, oldest first
    pub fn sessions(&self) -> &[CommitInfo] {
        &self.sessions
    }

    /// Open a reader on the latest commit
    pub fn reader(&self) -> Result<IndexReader> {
        IndexReader::open(&self.directory)
    }

    pub fn into_directory(self) -> Directory {
        self.directory
    }
}

/// Four baseline documents
pub fn baseline_corpus() -> Result<CorpusBuilder> {
    CorpusBuilder::new().baseline()
}

/// Baseline plus A..D, eight documents in two sessions
pub fn spans_advanced_corpus() -> Result<CorpusBuilder> {
    baseline_corpus()?.spans_advanced()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Term;
    use crate::models::DocId;

    #[test]
    fn test_baseline() {
        let corpus = baseline_corpus().unwrap();
        let reader = corpus.reader().unwrap();
        assert_eq!(reader.num_docs().unwrap(), 4);
        assert_eq!(corpus.sessions().len(), 1);
        assert_eq!(
            reader.stored_value(DocId(3), FIELD_ID).unwrap().as_deref(),
            Some("4")
        );
    }

    #[test]
    fn test_spans_advanced_layers_on_baseline() {
        let corpus = spans_advanced_corpus().unwrap();
        let reader = corpus.reader().unwrap();

        assert_eq!(reader.num_docs().unwrap(), 8);
        assert_eq!(corpus.sessions().len(), 2);
        assert_eq!(corpus.sessions()[1].docs_added, 4);
        for (offset, (id, _)) in SPANS_ADVANCED_DOCS.iter().enumerate() {
            let doc = DocId(4 + offset as u32);
            assert_eq!(reader.stored_value(doc, FIELD_ID).unwrap().as_deref(), Some(*id));
        }
        assert_eq!(reader.doc_freq(&Term::new(FIELD_TEXT, "should")).unwrap(), 7);
        assert_eq!(reader.doc_freq(&Term::new(FIELD_TEXT, "shouldn't")).unwrap(), 1);
    }

    #[test]
    fn test_random_documents_deterministic() {
        let texts = |seed| {
            let corpus = CorpusBuilder::new()
                .random_documents(seed, 20, &RANDOM_VOCABULARY)
                .unwrap();
            let reader = corpus.reader().unwrap();
            (0..20)
                .map(|i| reader.stored_value(DocId(i), FIELD_TEXT).unwrap().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(7), texts(7));
        assert_ne!(texts(7), texts(8));
    }

    #[test]
    fn test_random_documents_empty_vocabulary() {
        let err = CorpusBuilder::new().random_documents(1, 3, &[]).unwrap_err();
        assert!(matches!(err, SpindexError::InvalidRequest(_)));
    }
}
