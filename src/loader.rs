//! Reads sales records from a CSV file
//! The reader sits behind a trait so the caching loader doesn't care
//! where the records come from
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
    time::SystemTime,
};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::*;
use rust_decimal::Decimal;

use crate::{
    dataset::Dataset,
    error::{DashboardError, Result},
    records::{RawSalesRow, SalesRecord, DATE_COLUMN, REQUIRED_COLUMNS, TOTAL_COLUMN},
};

/// Date layouts tried in order when no others are configured
pub const DEFAULT_DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

pub trait SalesReader {
    /// Reads the whole file, aborting on the first malformed row
    fn read_csv<P: AsRef<Path>>(&self, path: P) -> Result<Dataset>;
}

/// Bulk CSV reader, parses every row before returning
pub struct CsvSalesReader {
    date_formats: Vec<String>,
}

impl Default for CsvSalesReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvSalesReader {
    pub fn new() -> Self {
        Self::with_date_formats(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()))
    }

    pub fn with_date_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date_formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    }

    fn parse_row(&self, record: StringRecord, headers: &StringRecord) -> Result<SalesRecord> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RawSalesRow = record.deserialize(Some(headers))?;

        let date = self
            .parse_date(&row.date)
            .ok_or_else(|| DashboardError::Parse {
                line,
                column: DATE_COLUMN,
                value: row.date.clone(),
            })?;

        let total = parse_amount(&row.total).ok_or_else(|| DashboardError::Parse {
            line,
            column: TOTAL_COLUMN,
            value: row.total.clone(),
        })?;

        Ok(SalesRecord::with_raw(
            date,
            row.city,
            row.product_line,
            row.customer_type,
            total,
            record,
        ))
    }
}

impl SalesReader for CsvSalesReader {
    fn read_csv<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|err| open_error(path, err))?;

        let headers = clean_headers(csv_reader.headers()?);
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(DashboardError::MissingColumn(*missing));
        }

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = self.parse_row(record?, &headers)?;
            trace!("Parsed sales record: {:?}", record);
            records.push(record);
        }

        debug!("Read {} records from {}", records.len(), path.display());
        Ok(Dataset::new(headers, records).with_source(path))
    }
}

fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Strips a leading byte-order mark so spreadsheet exports read back cleanly
fn clean_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect()
}

fn open_error(path: &Path, err: csv::Error) -> DashboardError {
    match err.kind() {
        csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound => {
            DashboardError::NotFound(path.to_path_buf())
        }
        _ => DashboardError::Csv(err),
    }
}

/// Identifies one version of the input file
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

impl CacheKey {
    fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => DashboardError::NotFound(path.to_path_buf()),
            _ => DashboardError::Io(err),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Owns the dataset for a process
/// Hands out the same shared dataset until the file on disk changes
pub struct DatasetLoader<R: SalesReader = CsvSalesReader> {
    path: PathBuf,
    reader: R,
    cache: Mutex<Option<(CacheKey, Arc<Dataset>)>>,
}

impl DatasetLoader<CsvSalesReader> {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_reader(path, CsvSalesReader::new())
    }
}

impl<R: SalesReader> DatasetLoader<R> {
    pub fn with_reader<P: AsRef<Path>>(path: P, reader: R) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reader,
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the dataset, reading the file only if it changed since the last call
    pub fn load(&self) -> Result<Arc<Dataset>> {
        let key = CacheKey::of(&self.path)?;
        // the slot is only ever replaced whole, a poisoned lock still holds a valid value
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached_key, dataset)) = cache.as_ref() {
            if *cached_key == key {
                debug!("Sales data cache hit for {}", self.path.display());
                return Ok(Arc::clone(dataset));
            }
            info!("{} changed on disk, reloading", self.path.display());
        }

        info!("Reading sales data: {}", self.path.display());
        let dataset = Arc::new(self.reader.read_csv(&self.path)?);
        info!("Loaded {} sales records", dataset.len());

        *cache = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::records::Month;

    #[test]
    fn test_no_file_exists() {
        let dataset = CsvSalesReader::new().read_csv("tests/data/non_existent.csv");
        assert!(matches!(dataset, Err(DashboardError::NotFound(_))));

        let loader = DatasetLoader::new("tests/data/non_existent.csv");
        assert!(matches!(loader.load(), Err(DashboardError::NotFound(_))));
    }

    /// Tests that we can read and parse the supermarket layout with its extra columns
    #[test]
    fn test_sales_reader() {
        let dataset = CsvSalesReader::new()
            .read_csv("tests/data/supermarket_sample.csv")
            .expect("Test file is not found");

        assert_eq!(dataset.len(), 8);
        assert_eq!(dataset.headers().get(0), Some("Invoice ID"));

        let first = &dataset.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2019, 1, 5).unwrap());
        assert_eq!(first.month(), Month::new(2019, 1).unwrap());
        assert_eq!(first.city(), "Yangon");
        assert_eq!(first.product_line(), "Health and beauty");
        assert_eq!(first.customer_type(), "Member");
        assert_eq!(first.total(), dec!(548.9715));
        // passthrough columns survive untouched
        assert_eq!(first.raw().get(0), Some("750-67-8428"));

        assert_eq!(dataset.records()[1].month(), Month::new(2019, 3).unwrap());
    }

    #[test]
    fn test_iso_dates() {
        let dataset = CsvSalesReader::new()
            .read_csv("tests/data/sales_basic.csv")
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[1].date(), NaiveDate::from_ymd_opt(2019, 2, 10).unwrap());
        assert_eq!(dataset.records()[2].total(), dec!(30));
    }

    #[test]
    fn test_bad_date_aborts_load() {
        let result = CsvSalesReader::new().read_csv("tests/data/sales_bad_date.csv");

        match result {
            Err(DashboardError::Parse {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, DATE_COLUMN);
                assert_eq!(value, "2019-13-45");
            }
            other => panic!("expected a date parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_total_aborts_load() {
        let result = CsvSalesReader::new().read_csv("tests/data/sales_bad_total.csv");

        assert!(matches!(
            result,
            Err(DashboardError::Parse { column: TOTAL_COLUMN, .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let result = CsvSalesReader::new().read_csv("tests/data/sales_missing_column.csv");
        assert!(matches!(result, Err(DashboardError::MissingColumn("Customer type"))));
    }

    #[test]
    fn test_custom_date_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,City,Product line,Customer type,Total").unwrap();
        writeln!(file, "05.01.2019,Yangon,Food,Member,10.5").unwrap();
        file.flush().unwrap();

        assert!(CsvSalesReader::new().read_csv(file.path()).is_err());

        let dataset = CsvSalesReader::with_date_formats(vec!["%d.%m.%Y"])
            .read_csv(file.path())
            .unwrap();
        assert_eq!(dataset.records()[0].month(), Month::new(2019, 1).unwrap());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFDate,City,Product line,Customer type,Total\n")
            .unwrap();
        file.write_all(b"2019-01-05,Yangon,Food,Member,10\n").unwrap();
        file.flush().unwrap();

        let dataset = CsvSalesReader::new().read_csv(file.path()).unwrap();
        assert_eq!(dataset.headers().get(0), Some("Date"));
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_loader_caches_dataset() {
        let loader = DatasetLoader::new("tests/data/sales_basic.csv");

        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.source(), Some(Path::new("tests/data/sales_basic.csv")));
    }

    #[test]
    fn test_loader_reloads_changed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,City,Product line,Customer type,Total").unwrap();
        writeln!(file, "2019-01-05,Yangon,Food,Member,10").unwrap();
        file.flush().unwrap();

        let loader = DatasetLoader::new(file.path());
        let before = loader.load().unwrap();
        assert_eq!(before.len(), 1);

        writeln!(file, "2019-02-05,Mandalay,Food,Normal,20").unwrap();
        file.flush().unwrap();

        let after = loader.load().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        // the old dataset is still usable by whoever holds it
        assert_eq!(before.len(), 1);
    }
}
