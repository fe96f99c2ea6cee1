//! Roster loading from delimited files.
//!
//! The input is a header-first CSV with at least `Name` and `Email` columns.
//! Rows are kept as ordered key/value records; the engine only sees the
//! derived list of names.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Result, RosterError, ValidationError};

/// Column holding participant names.
pub const NAME_COLUMN: &str = "Name";
/// Column holding participant email addresses.
pub const EMAIL_COLUMN: &str = "Email";

/// One row, keyed by header, in column order.
pub type Record = IndexMap<String, String>;

/// Read every record from a CSV file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RosterError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    load_records_from_reader(file)
}

/// Read every record from CSV data. Short rows simply lack the trailing keys.
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(RosterError::from)?.clone();
    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(RosterError::from)?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Values of `key` across `records`, skipping records without it.
pub fn extract_values(records: &[Record], key: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.get(key).cloned())
        .collect()
}

/// Pair names with addresses. Both lists must be the same length.
///
/// A repeated name keeps the address from its last row.
pub fn contact_map(names: &[String], emails: &[String]) -> Result<IndexMap<String, String>, ValidationError> {
    if names.len() != emails.len() {
        return Err(ValidationError::LengthMismatch {
            what: "names".to_string(),
            keys: names.len(),
            values: emails.len(),
        });
    }
    for name in duplicate_names(names) {
        tracing::warn!(name, "name appears more than once; all entries share the last address");
    }
    Ok(names.iter().cloned().zip(emails.iter().cloned()).collect())
}

/// Names occurring more than once, in first-seen order.
pub fn duplicate_names(names: &[String]) -> Vec<&str> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(name, _)| name)
        .collect()
}

/// Names and contact addresses of everyone in a roster file.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub names: Vec<String>,
    pub contacts: IndexMap<String, String>,
}

impl Roster {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_records(&load_records(path)?)
    }

    pub fn from_records(records: &[Record]) -> Result<Self> {
        if !records.is_empty() && records.iter().all(|r| !r.contains_key(NAME_COLUMN)) {
            return Err(RosterError::MissingColumn(NAME_COLUMN.to_string()).into());
        }
        let names = extract_values(records, NAME_COLUMN);
        let emails = extract_values(records, EMAIL_COLUMN);
        let contacts = contact_map(&names, &emails)?;
        tracing::debug!(participants = names.len(), "roster loaded");
        Ok(Self { names, contacts })
    }
}
