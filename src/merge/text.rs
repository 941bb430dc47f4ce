//! Delimited text file backend for merge sources.
//!
//! One reader covers all text kinds; the delimiter and whether line 1 holds
//! the field keys come from the `MergeKind`. Quoting and blank-line handling
//! follow the csv crate's defaults; rows may be ragged.

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::MergeRecord;

/// Read a delimited text file into a key schema and records.
///
/// With `keys_in_line1` the first row names the fields; the returned key
/// list keeps the first occurrence of a repeated name. Fields beyond the key
/// list are keyed by their 1-based column number but do not extend the
/// schema. Without a key line every column is keyed by its 1-based number
/// and the schema spans the widest row of the file.
pub(crate) fn read_delimited(
    path: &Utf8Path,
    delimiter: u8,
    keys_in_line1: bool,
) -> Result<(Vec<String>, Vec<MergeRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open merge source {}", path))?;

    let mut line1_keys: Vec<String> = Vec::new();
    let mut keys: Vec<String> = Vec::new();
    let mut records: Vec<MergeRecord> = Vec::new();
    let mut widest = 0usize;

    for (row_index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Read merge source {}", path))?;
        if keys_in_line1 && row_index == 0 {
            line1_keys = row.iter().map(str::to_owned).collect();
            for key in &line1_keys {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            continue;
        }
        if !keys_in_line1 {
            widest = widest.max(row.len());
        }
        let mut record = MergeRecord::new();
        for (i, field) in row.iter().enumerate() {
            let key = match line1_keys.get(i) {
                Some(name) if keys_in_line1 => name.clone(),
                _ => (i + 1).to_string(),
            };
            record.insert(key, field);
        }
        records.push(record);
    }

    if !keys_in_line1 {
        keys = (1..=widest).map(|n| n.to_string()).collect();
    }
    Ok((keys, records))
}
