use std::path::{Path, PathBuf};

use csv::StringRecord;
use hashbrown::HashSet;

use crate::records::{SalesRecord, REQUIRED_COLUMNS};

/// The loaded sales data: the header row plus every record in file order
///
/// Read-only once built, so one instance can back any number of sessions.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    records: Vec<SalesRecord>,
    source: Option<PathBuf>,
}

impl Dataset {
    pub fn new(headers: StringRecord, records: Vec<SalesRecord>) -> Self {
        Self {
            headers,
            records,
            source: None,
        }
    }

    /// Dataset made of records built in memory, with only the required columns
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self::new(StringRecord::from(REQUIRED_COLUMNS.to_vec()), records)
    }

    pub(crate) fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The file this dataset was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Distinct cities in order of first appearance
    pub fn cities(&self) -> Vec<&str> {
        self.distinct(SalesRecord::city)
    }

    /// Distinct product lines in order of first appearance
    pub fn product_lines(&self) -> Vec<&str> {
        self.distinct(SalesRecord::product_line)
    }

    /// Distinct customer types in order of first appearance
    pub fn customer_types(&self) -> Vec<&str> {
        self.distinct(SalesRecord::customer_type)
    }

    fn distinct<'a>(&'a self, field: impl Fn(&'a SalesRecord) -> &'a str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(field)
            .filter(|value| seen.insert(*value))
            .collect()
    }
}
