//! Index writer: the only way documents enter an index
//!
//! State machine: `Open` → (`add_document` | `delete_document`)* → `Closed`.
//! `close` publishes everything buffered in one atomic commit; `rollback`
//! (or dropping an open writer) discards it.

use std::sync::Arc;
use tracing::{debug, info};

use super::buffer::MutableBuffer;
use super::directory::{Commit, Directory};
use super::types::{DocId, Generation, OpenMode};
use crate::error::{Result, SpindexError};
use crate::models::Document;

/// Writer lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Open,
    Closed,
}

/// Summary of a published commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    pub generation: Generation,
    pub docs_added: usize,
    pub docs_deleted: u64,
    /// Live documents after the commit
    pub num_docs: u32,
    pub max_doc: u32,
}

/// Single-session index writer
pub struct IndexWriter {
    directory: Directory,
    session: u64,
    mode: OpenMode,
    buffer: Option<MutableBuffer>,
    lock_held: bool,
}

impl IndexWriter {
    /// Open a writer session on `directory`.
    ///
    /// Fails with `LockObtainFailed` while another writer is open.
    pub fn open(directory: &Directory, mode: OpenMode) -> Result<Self> {
        let session = directory.acquire_write_lock()?;
        let base = match mode {
            OpenMode::Create => Arc::new(Commit::empty()),
            OpenMode::Append => directory.current_commit(),
        };

        debug!(
            session,
            ?mode,
            base_docs = base.max_doc(),
            "index writer opened"
        );

        Ok(Self {
            directory: directory.clone(),
            session,
            mode,
            buffer: Some(MutableBuffer::new(base)),
            lock_held: true,
        })
    }

    pub fn state(&self) -> WriterState {
        if self.buffer.is_some() {
            WriterState::Open
        } else {
            WriterState::Closed
        }
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Documents added so far in this session
    pub fn buffered_docs(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.buffered_docs())
    }

    /// Tokenize and buffer a document, returning its doc id.
    ///
    /// Accepts a [`Document`] or anything convertible to one, such as a list
    /// of `(field, text)` pairs.
    pub fn add_document(&mut self, doc: impl Into<Document>) -> Result<DocId> {
        let buffer = self.buffer.as_mut().ok_or_else(closed_writer)?;
        Ok(buffer.add(doc.into(), self.directory.tokenizer()))
    }

    /// Delete a committed or buffered document.
    ///
    /// Returns false when the doc id is unknown or already deleted. The
    /// deletion becomes visible at `close`.
    pub fn delete_document(&mut self, doc_id: DocId) -> Result<bool> {
        let buffer = self.buffer.as_mut().ok_or_else(closed_writer)?;
        Ok(buffer.delete(doc_id))
    }

    /// Finalize all postings, publish them as one commit, and release the
    /// directory. Any later call on this writer fails with `IndexState`.
    pub fn close(&mut self) -> Result<CommitInfo> {
        let buffer = self.buffer.take().ok_or_else(closed_writer)?;
        let docs_added = buffer.buffered_docs();
        let docs_deleted = buffer.deleted_docs();

        let generation = self.directory.generation() + 1;
        let commit = self.directory.publish(buffer.into_commit(generation));
        self.release();

        let info = CommitInfo {
            generation,
            docs_added,
            docs_deleted,
            num_docs: commit.num_docs(),
            max_doc: commit.max_doc(),
        };

        info!(
            generation,
            docs_added,
            docs_deleted,
            num_docs = info.num_docs,
            terms = commit.term_count(),
            "index committed"
        );

        Ok(info)
    }

    /// Discard everything buffered in this session and release the directory.
    pub fn rollback(&mut self) -> Result<()> {
        let buffer = self.buffer.take().ok_or_else(closed_writer)?;
        debug!(
            session = self.session,
            discarded = buffer.buffered_docs(),
            "index writer rolled back"
        );
        self.release();
        Ok(())
    }

    fn release(&mut self) {
        if self.lock_held {
            self.directory.release_write_lock(self.session);
            self.lock_held = false;
        }
    }
}

impl Drop for IndexWriter {
    fn drop(&mut self) {
        if self.buffer.take().is_some() {
            debug!(session = self.session, "open index writer dropped, discarding buffer");
        }
        self.release();
    }
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("session", &self.session)
            .field("mode", &self.mode)
            .field("state", &self.state())
            .field("buffered_docs", &self.buffered_docs())
            .finish()
    }
}

fn closed_writer() -> SpindexError {
    SpindexError::IndexState("index writer is closed".to_string())
}
