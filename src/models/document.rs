use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Document number assigned by the writer, dense and insertion-ordered
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DocId(pub u32);

impl DocId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// How a field value is analyzed and kept
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Tokenized, indexed with positions, stored
    Text,
    /// Indexed as one un-tokenized term, stored
    Keyword,
    /// Stored only
    Stored,
}

impl FieldKind {
    pub fn is_indexed(self) -> bool {
        !matches!(self, FieldKind::Stored)
    }
}

/// One named field value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub kind: FieldKind,
}

/// A document to be indexed: an ordered list of field values
///
/// The same field name may appear more than once; its values are indexed as
/// one continuous token stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a tokenized text field
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(name, value, FieldKind::Text)
    }

    /// Add an un-tokenized keyword field
    pub fn keyword(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(name, value, FieldKind::Keyword)
    }

    /// Add a stored-only field
    pub fn stored(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(name, value, FieldKind::Stored)
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            kind,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// All values stored under `name`, in insertion order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Document::new(), |doc, (name, value)| doc.text(name, value))
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Document {
    fn from(fields: Vec<(K, V)>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Document {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Document {
    fn from(fields: BTreeMap<String, String>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for Document {
    fn from(fields: HashMap<String, String>) -> Self {
        // Sort for a deterministic field order
        fields.into_iter().collect::<BTreeMap<_, _>>().into()
    }
}

/// A document as returned by a reader
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub doc_id: DocId,
    pub document: Document,
    pub live: bool,
}

impl StoredDocument {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.document.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id() {
        let id = DocId::new(41);
        assert_eq!(id.as_u32(), 41);
        assert_eq!(id.next(), DocId(42));
        assert_eq!(id.to_string(), "doc#41");
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::new()
            .keyword("id", "A")
            .text("body", "Should we?")
            .stored("source", "fixture");

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("id"), Some("A"));
        assert_eq!(doc.get("missing"), None);
        assert_eq!(doc.fields()[0].kind, FieldKind::Keyword);
        assert!(!doc.fields()[2].kind.is_indexed());
    }

    #[test]
    fn test_document_from_pairs() {
        let doc: Document = vec![("body", "one"), ("body", "two")].into();
        assert_eq!(doc.get_all("body").collect::<Vec<_>>(), vec!["one", "two"]);
        assert!(doc.fields().iter().all(|f| f.kind == FieldKind::Text));
    }

    #[test]
    fn test_document_from_hash_map_is_ordered() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());

        let doc: Document = map.into();
        assert_eq!(doc.fields()[0].name, "a");
        assert_eq!(doc.fields()[1].name, "b");
    }
}
