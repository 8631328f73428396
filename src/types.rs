use indexmap::IndexMap;

use crate::names;

/// One entry in a `.bib` file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BibEntry {
    /// entry type as written, e.g. “Article”
    pub kind: String,
    /// entry name, e.g. “DBLP:books/lib/Knuth97”
    pub id: String,
    /// fields in order of first appearance, e.g. “author” mapped to “Donald Ervin Knuth”.
    /// Names are lower-case, values have all macros expanded.
    pub fields: IndexMap<String, String>,
}

impl BibEntry {
    /// Generate a new, empty instance of BibEntry. Can also be called through the `Default` implementation.
    pub fn new() -> BibEntry {
        BibEntry {
            kind: String::new(),
            id: String::new(),
            fields: IndexMap::new(),
        }
    }

    /// Value of the field `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    /// Splits a name list field such as “author” or “editor” into its persons.
    /// A missing field yields no persons.
    pub fn persons(&self, name: &str) -> Vec<names::PersonName> {
        self.get(name).map(names::parse_persons).unwrap_or_default()
    }
}

impl Default for BibEntry {
    fn default() -> Self {
        Self::new()
    }
}
