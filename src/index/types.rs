//! Core types for the inverted index

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::models::DocId;

/// Commit generation (monotonically increasing per directory)
pub type Generation = u64;

/// A searchable unit: token text within a named field
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    field: String,
    text: String,
}

impl Term {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.text)
    }
}

/// A single posting entry within a posting list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocId,
    /// Term frequency in this document's field
    pub term_frequency: u32,
    /// Token positions, strictly increasing
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc: DocId, position: u32) -> Self {
        Self {
            doc,
            term_frequency: 1,
            positions: vec![position],
        }
    }

    pub fn with_positions(doc: DocId, positions: Vec<u32>) -> Self {
        Self {
            doc,
            term_frequency: positions.len() as u32,
            positions,
        }
    }

    /// Record another occurrence. Positions must arrive in increasing order.
    pub fn push_position(&mut self, position: u32) {
        debug_assert!(self.positions.last().map_or(true, |&p| p < position));
        self.positions.push(position);
        self.term_frequency += 1;
    }
}

/// How a writer treats the existing committed index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Start from an empty index; the commit replaces everything
    Create,
    /// Keep committed documents and continue their doc id sequence
    Append,
}
