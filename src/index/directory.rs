//! Commit point shared between one writer and any number of readers
//!
//! The latest `Commit` sits behind an `ArcSwap`: a writer publishes a fully
//! built commit with a single pointer swap, and a reader takes its snapshot
//! with a single load. Neither side ever observes a half-written commit.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::doc_store::DocStore;
use super::postings::PostingsList;
use super::statistics::FieldStatistics;
use super::types::{Generation, Term};
use crate::config::IndexSettings;
use crate::error::{Result, SpindexError};
use crate::tokenizer::Tokenizer;

/// Immutable, point-in-time index state
#[derive(Debug, Default)]
pub struct Commit {
    pub(crate) generation: Generation,
    pub(crate) postings: BTreeMap<Term, Arc<PostingsList>>,
    pub(crate) docs: DocStore,
    pub(crate) field_stats: FieldStatistics,
}

impl Commit {
    /// The state of a freshly created index
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Live documents
    pub fn num_docs(&self) -> u32 {
        self.docs.live_count()
    }

    /// Doc ids ever assigned, deleted ones included
    pub fn max_doc(&self) -> u32 {
        self.docs.max_doc()
    }

    pub fn postings(&self, term: &Term) -> Option<&Arc<PostingsList>> {
        self.postings.get(term)
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Terms of one field in sorted order
    pub fn terms<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.postings.keys().filter(move |t| t.field() == field)
    }

    pub fn docs(&self) -> &DocStore {
        &self.docs
    }

    pub fn field_stats(&self) -> &FieldStatistics {
        &self.field_stats
    }
}

#[derive(Debug)]
struct DirectoryInner {
    settings: Arc<IndexSettings>,
    tokenizer: Arc<Tokenizer>,
    commit: ArcSwap<Commit>,
    /// Session id of the writer holding the lock
    write_lock: Mutex<Option<u64>>,
    next_session: AtomicU64,
}

/// In-memory index target
///
/// Cloning a `Directory` yields another handle to the same index.
#[derive(Clone, Debug)]
pub struct Directory {
    inner: Arc<DirectoryInner>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(IndexSettings::default())
    }
}

impl Directory {
    pub fn new(settings: IndexSettings) -> Self {
        let tokenizer = Tokenizer::new(&settings.tokenizer);
        Self {
            inner: Arc::new(DirectoryInner {
                settings: Arc::new(settings),
                tokenizer: Arc::new(tokenizer),
                commit: ArcSwap::from_pointee(Commit::empty()),
                write_lock: Mutex::new(None),
                next_session: AtomicU64::new(1),
            }),
        }
    }

    pub fn settings(&self) -> &Arc<IndexSettings> {
        &self.inner.settings
    }

    pub fn tokenizer(&self) -> &Arc<Tokenizer> {
        &self.inner.tokenizer
    }

    /// Snapshot of the latest published commit
    pub fn current_commit(&self) -> Arc<Commit> {
        self.inner.commit.load_full()
    }

    pub fn generation(&self) -> Generation {
        self.inner.commit.load().generation
    }

    /// Whether a writer currently holds the directory
    pub fn is_locked(&self) -> bool {
        self.inner.write_lock.lock().is_some()
    }

    pub(crate) fn acquire_write_lock(&self) -> Result<u64> {
        let mut holder = self.inner.write_lock.lock();
        if holder.is_some() {
            return Err(SpindexError::LockObtainFailed);
        }
        let session = self.inner.next_session.fetch_add(1, Ordering::Relaxed);
        *holder = Some(session);
        debug!(session, "write lock acquired");
        Ok(session)
    }

    pub(crate) fn release_write_lock(&self, session: u64) {
        let mut holder = self.inner.write_lock.lock();
        if *holder == Some(session) {
            *holder = None;
            debug!(session, "write lock released");
        }
    }

    /// Make `commit` the state every subsequently opened reader sees
    pub(crate) fn publish(&self, commit: Commit) -> Arc<Commit> {
        let commit = Arc::new(commit);
        self.inner.commit.store(Arc::clone(&commit));
        commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory() {
        let dir = Directory::default();
        let commit = dir.current_commit();

        assert_eq!(commit.generation(), 0);
        assert_eq!(commit.num_docs(), 0);
        assert_eq!(commit.term_count(), 0);
        assert!(!dir.is_locked());
    }

    #[test]
    fn test_write_lock_is_exclusive() {
        let dir = Directory::default();
        let session = dir.acquire_write_lock().unwrap();

        assert!(dir.is_locked());
        assert!(matches!(
            dir.acquire_write_lock(),
            Err(SpindexError::LockObtainFailed)
        ));

        // A stale session id cannot release someone else's lock
        dir.release_write_lock(session + 100);
        assert!(dir.is_locked());

        dir.release_write_lock(session);
        assert!(!dir.is_locked());
        assert!(dir.acquire_write_lock().is_ok());
    }

    #[test]
    fn test_publish_swaps_commit() {
        let dir = Directory::default();
        let before = dir.current_commit();

        dir.publish(Commit {
            generation: 1,
            ..Commit::empty()
        });

        assert_eq!(before.generation(), 0);
        assert_eq!(dir.generation(), 1);
    }

    #[test]
    fn test_clone_shares_state() {
        let dir = Directory::default();
        let other = dir.clone();
        dir.publish(Commit {
            generation: 3,
            ..Commit::empty()
        });
        assert_eq!(other.generation(), 3);
    }
}
