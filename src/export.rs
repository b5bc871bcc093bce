use std::{fs::File, io::Write, path::Path};

use chrono::NaiveDate;
use csv::StringRecord;
use log::*;

use crate::{error::Result, records::SalesRecord};

/// Spreadsheet tools need this to detect UTF-8
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `records` as CSV with the same columns the data was read with
pub fn write_csv<W: Write>(
    mut writer: W,
    headers: &StringRecord,
    records: &[&SalesRecord],
) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(headers)?;
    for record in records {
        csv_writer.write_record(record.raw())?;
    }
    csv_writer.flush()?;

    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(
    path: P,
    headers: &StringRecord,
    records: &[&SalesRecord],
) -> Result<()> {
    let path = path.as_ref();
    info!("Exporting {} records to {}", records.len(), path.display());
    write_csv(File::create(path)?, headers, records)
}

/// Default name of an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sales_data_{}.csv", date.format("%Y-%m-%d"))
}
