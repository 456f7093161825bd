//! Per-document, per-field token counts used for length normalization

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::DocId;

/// Token counts of one field, indexed by doc id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLengths {
    lengths: Vec<u32>,
    /// Sum of all recorded lengths
    total_tokens: u64,
    /// Number of documents with a non-zero length
    doc_count: u32,
}

impl FieldLengths {
    pub fn get(&self, doc: DocId) -> u32 {
        self.lengths.get(doc.as_usize()).copied().unwrap_or(0)
    }

    /// Add `len` tokens for `doc` (a field may have several values)
    pub fn add(&mut self, doc: DocId, len: u32) {
        if len == 0 {
            return;
        }
        let idx = doc.as_usize();
        if self.lengths.len() <= idx {
            self.lengths.resize(idx + 1, 0);
        }
        if self.lengths[idx] == 0 {
            self.doc_count += 1;
        }
        self.lengths[idx] += len;
        self.total_tokens += len as u64;
    }

    /// Forget the length recorded for `doc`
    pub fn clear(&mut self, doc: DocId) {
        if let Some(len) = self.lengths.get_mut(doc.as_usize()) {
            if *len > 0 {
                self.total_tokens -= *len as u64;
                self.doc_count -= 1;
                *len = 0;
            }
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    /// Average length over documents that have the field
    pub fn average(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.doc_count as f64
        }
    }
}

/// Field statistics for every indexed field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatistics {
    fields: BTreeMap<String, FieldLengths>,
}

impl FieldStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` was indexed for `doc` with `len` tokens.
    ///
    /// The field is registered even when `len` is zero, so a query on a
    /// field whose only values were all stop words is still a known field.
    pub fn record(&mut self, doc: DocId, field: &str, len: u32) {
        self.fields.entry(field.to_string()).or_default().add(doc, len);
    }

    /// Token count of `field` in `doc` (0 when absent)
    pub fn field_length(&self, doc: DocId, field: &str) -> u32 {
        self.fields.get(field).map(|f| f.get(doc)).unwrap_or(0)
    }

    pub fn field(&self, field: &str) -> Option<&FieldLengths> {
        self.fields.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Drop every length recorded for `doc`
    pub fn remove_document(&mut self, doc: DocId) {
        for lengths in self.fields.values_mut() {
            lengths.clear(doc);
        }
    }

    /// Fold another set of statistics into this one
    pub fn merge(&mut self, other: &FieldStatistics) {
        for (name, lengths) in &other.fields {
            let target = self.fields.entry(name.clone()).or_default();
            for (idx, &len) in lengths.lengths.iter().enumerate() {
                target.add(DocId(idx as u32), len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lengths() {
        let mut stats = FieldStatistics::new();
        stats.record(DocId(0), "text", 4);
        stats.record(DocId(2), "text", 6);
        stats.record(DocId(2), "text", 2);
        stats.record(DocId(1), "id", 1);

        assert_eq!(stats.field_length(DocId(0), "text"), 4);
        assert_eq!(stats.field_length(DocId(1), "text"), 0);
        assert_eq!(stats.field_length(DocId(2), "text"), 8);
        assert_eq!(stats.field_length(DocId(9), "text"), 0);
        assert_eq!(stats.field_length(DocId(0), "missing"), 0);

        let text = stats.field("text").unwrap();
        assert_eq!(text.doc_count(), 2);
        assert_eq!(text.total_tokens(), 12);
        assert!((text.average() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_field_is_known() {
        let mut stats = FieldStatistics::new();
        stats.record(DocId(0), "text", 0);

        assert!(stats.has_field("text"));
        assert_eq!(stats.field("text").unwrap().doc_count(), 0);
        assert_eq!(stats.field("text").unwrap().average(), 0.0);
    }

    #[test]
    fn test_remove_document() {
        let mut stats = FieldStatistics::new();
        stats.record(DocId(0), "text", 4);
        stats.record(DocId(1), "text", 2);
        stats.remove_document(DocId(0));

        assert_eq!(stats.field_length(DocId(0), "text"), 0);
        let text = stats.field("text").unwrap();
        assert_eq!(text.doc_count(), 1);
        assert_eq!(text.total_tokens(), 2);
    }

    #[test]
    fn test_merge() {
        let mut a = FieldStatistics::new();
        a.record(DocId(0), "text", 4);

        let mut b = FieldStatistics::new();
        b.record(DocId(1), "text", 6);
        b.record(DocId(1), "title", 1);

        a.merge(&b);
        assert_eq!(a.field_length(DocId(1), "text"), 6);
        assert_eq!(a.field_names().collect::<Vec<_>>(), vec!["text", "title"]);
    }
}
