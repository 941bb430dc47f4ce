//! Merge sources: external record providers for data-merged labels.
//!
//! A `Merge` exposes an ordered, de-duplicated key schema, a primary key and
//! a list of records read from its backing source. Sources form a closed
//! family (`MergeKind`): the "none" source plus delimited text files with or
//! without a key line. Changing the source location replaces keys and
//! records wholesale; partial updates are not supported. The document model
//! reads the schema and records but only ever mutates the per-record
//! selected flags.

mod text;

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The closed set of merge source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeKind {
    /// No merge source attached.
    None,
    /// Comma separated values, keys are column numbers.
    TextComma,
    /// Comma separated values, first line holds the keys.
    TextCommaKeys,
    /// Tab separated values, keys are column numbers.
    TextTab,
    /// Tab separated values, first line holds the keys.
    TextTabKeys,
    /// Colon separated values, keys are column numbers.
    TextColon,
    /// Colon separated values, first line holds the keys.
    TextColonKeys,
}

impl MergeKind {
    /// All kinds, in presentation order.
    pub fn all() -> [MergeKind; 7] {
        [
            MergeKind::None,
            MergeKind::TextCommaKeys,
            MergeKind::TextComma,
            MergeKind::TextTabKeys,
            MergeKind::TextTab,
            MergeKind::TextColonKeys,
            MergeKind::TextColon,
        ]
    }

    /// Stable identifier, used in saved documents.
    pub fn id(&self) -> &'static str {
        match self {
            MergeKind::None => "None",
            MergeKind::TextComma => "Text/Comma",
            MergeKind::TextCommaKeys => "Text/Comma/Line1Keys",
            MergeKind::TextTab => "Text/Tab",
            MergeKind::TextTabKeys => "Text/Tab/Line1Keys",
            MergeKind::TextColon => "Text/Colon",
            MergeKind::TextColonKeys => "Text/Colon/Line1Keys",
        }
    }

    /// Human readable name for source pickers.
    pub fn name(&self) -> &'static str {
        match self {
            MergeKind::None => "None",
            MergeKind::TextComma => "Text: Comma Separated Values (CSV)",
            MergeKind::TextCommaKeys => "Text: Comma Separated Values (CSV), keys on line 1",
            MergeKind::TextTab => "Text: Tab Separated Values (TSV)",
            MergeKind::TextTabKeys => "Text: Tab Separated Values (TSV), keys on line 1",
            MergeKind::TextColon => "Text: Colon Separated Values",
            MergeKind::TextColonKeys => "Text: Colon Separated Values, keys on line 1",
        }
    }

    /// Resolve a stable identifier back to a kind.
    ///
    /// Unknown identifiers log a warning and yield `None`.
    pub fn from_id(id: &str) -> Option<MergeKind> {
        let kind = Self::all().into_iter().find(|k| k.id() == id);
        if kind.is_none() {
            tracing::warn!("Unknown merge source id \"{}\"", id);
        }
        kind
    }

    /// Field delimiter for text-backed kinds.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            MergeKind::None => None,
            MergeKind::TextComma | MergeKind::TextCommaKeys => Some(b','),
            MergeKind::TextTab | MergeKind::TextTabKeys => Some(b'\t'),
            MergeKind::TextColon | MergeKind::TextColonKeys => Some(b':'),
        }
    }

    /// Whether the first line of the source holds the field keys.
    pub fn keys_in_line1(&self) -> bool {
        matches!(
            self,
            MergeKind::TextCommaKeys | MergeKind::TextTabKeys | MergeKind::TextColonKeys
        )
    }
}

/// One record of a merge source: an ordered field map plus a selected flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Field values keyed by field name, in source column order.
    pub fields: IndexMap<String, String>,
    /// Whether this record takes part in the merge. Starts true.
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl MergeRecord {
    /// An empty record, selected for merge.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            selected: true,
        }
    }

    /// Set a field value. A repeated key keeps its position and overwrites
    /// the value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Field value for `key`, or "" when the record does not carry it.
    pub fn value(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Number of fields in this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for MergeRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// An attached merge source: kind, location, key schema and records.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    kind: MergeKind,
    source: Option<Utf8PathBuf>,
    keys: Vec<String>,
    primary_key: Option<String>,
    records: Vec<MergeRecord>,
}

impl Merge {
    /// The detached "none" source: no keys, no records.
    pub fn none() -> Self {
        Self::new(MergeKind::None)
    }

    /// An empty source of the given kind, before a location is set.
    pub fn new(kind: MergeKind) -> Self {
        Self {
            kind,
            source: None,
            keys: Vec::new(),
            primary_key: None,
            records: Vec::new(),
        }
    }

    /// The source kind.
    pub fn kind(&self) -> MergeKind {
        self.kind
    }

    /// The source location, when one has been set.
    pub fn source(&self) -> Option<&Utf8Path> {
        self.source.as_deref()
    }

    /// Point the source at `path` and re-read it, replacing the key schema
    /// and all records. The explicit primary key is kept only if it still
    /// exists in the new schema.
    pub fn set_source(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        let (Some(delimiter), keys_in_line1) = (self.kind.delimiter(), self.kind.keys_in_line1())
        else {
            tracing::warn!(
                "Merge source kind \"{}\" takes no location; ignoring \"{}\"",
                self.kind.id(),
                path
            );
            return Ok(());
        };
        let (keys, records) = text::read_delimited(path, delimiter, keys_in_line1)?;
        self.source = Some(path.to_owned());
        self.keys = keys;
        self.records = records;
        if let Some(pk) = &self.primary_key {
            if !self.keys.iter().any(|k| k == pk) {
                self.primary_key = None;
            }
        }
        Ok(())
    }

    /// Ordered, de-duplicated field keys.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The designated primary key: the explicit choice, or the first key.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key
            .as_deref()
            .or_else(|| self.keys.first().map(String::as_str))
    }

    /// Designate a primary key. An unknown key logs a warning and keeps the
    /// previous designation.
    pub fn set_primary_key(&mut self, key: &str) {
        if self.keys.iter().any(|k| k == key) {
            self.primary_key = Some(key.to_owned());
        } else {
            tracing::warn!("Unknown merge primary key \"{}\"", key);
        }
    }

    /// All records, in source order.
    pub fn records(&self) -> &[MergeRecord] {
        &self.records
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// The records currently selected for merge, in source order.
    pub fn selected_records(&self) -> Vec<&MergeRecord> {
        self.records.iter().filter(|r| r.selected).collect()
    }

    /// Set the selected flag of the record at `index`.
    pub fn set_record_selected(&mut self, index: usize, selected: bool) {
        match self.records.get_mut(index) {
            Some(record) => record.selected = selected,
            None => tracing::warn!("Merge record index {} out of range", index),
        }
    }

    /// Select every record for merge.
    pub fn select_all_records(&mut self) {
        for record in &mut self.records {
            record.selected = true;
        }
    }

    /// Exclude every record from merge.
    pub fn unselect_all_records(&mut self) {
        for record in &mut self.records {
            record.selected = false;
        }
    }
}

impl Default for Merge {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ids_round_trip() {
        for kind in MergeKind::all() {
            assert_eq!(MergeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(MergeKind::from_id("Text/Semicolon"), None);
    }

    #[test]
    fn test_kind_delimiters() {
        assert_eq!(MergeKind::None.delimiter(), None);
        assert_eq!(MergeKind::TextComma.delimiter(), Some(b','));
        assert_eq!(MergeKind::TextTabKeys.delimiter(), Some(b'\t'));
        assert_eq!(MergeKind::TextColon.delimiter(), Some(b':'));
        assert!(MergeKind::TextColonKeys.keys_in_line1());
        assert!(!MergeKind::TextColon.keys_in_line1());
    }

    #[test]
    fn test_none_source_is_empty() {
        let merge = Merge::none();
        assert_eq!(merge.kind(), MergeKind::None);
        assert!(merge.keys().is_empty());
        assert_eq!(merge.record_count(), 0);
        assert_eq!(merge.primary_key(), None);
    }

    #[test]
    fn test_none_source_ignores_location() {
        let mut merge = Merge::none();
        merge.set_source("customers.csv").unwrap();
        assert_eq!(merge.source(), None);
        assert_eq!(merge.record_count(), 0);
    }

    #[test]
    fn test_record_value_defaults_empty() {
        let mut record = MergeRecord::new();
        record.insert("name", "Ada");
        assert_eq!(record.value("name"), "Ada");
        assert_eq!(record.value("email"), "");
        assert!(record.selected);
    }

    #[test]
    fn test_record_selection_ops() {
        let mut merge = Merge::new(MergeKind::TextCommaKeys);
        merge.records = vec![MergeRecord::new(), MergeRecord::new(), MergeRecord::new()];
        assert_eq!(merge.selected_records().len(), 3);

        merge.set_record_selected(1, false);
        assert_eq!(merge.selected_records().len(), 2);
        assert!(merge.records()[0].selected);
        assert!(!merge.records()[1].selected);

        merge.unselect_all_records();
        assert!(merge.selected_records().is_empty());
        merge.select_all_records();
        assert_eq!(merge.selected_records().len(), 3);

        // Out of range is a warning, not a panic.
        merge.set_record_selected(17, false);
        assert_eq!(merge.selected_records().len(), 3);
    }

    #[test]
    fn test_primary_key_defaults_to_first() {
        let mut merge = Merge::new(MergeKind::TextCommaKeys);
        merge.keys = vec!["id".into(), "name".into(), "email".into()];
        assert_eq!(merge.primary_key(), Some("id"));

        merge.set_primary_key("email");
        assert_eq!(merge.primary_key(), Some("email"));

        // Unknown key keeps the previous designation.
        merge.set_primary_key("phone");
        assert_eq!(merge.primary_key(), Some("email"));
    }
}
