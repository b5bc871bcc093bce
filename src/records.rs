use std::fmt::Display;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DATE_COLUMN: &str = "Date";
pub const CITY_COLUMN: &str = "City";
pub const PRODUCT_LINE_COLUMN: &str = "Product line";
pub const CUSTOMER_TYPE_COLUMN: &str = "Customer type";
pub const TOTAL_COLUMN: &str = "Total";

/// Columns every sales file must carry, the rest are passed through untouched
pub const REQUIRED_COLUMNS: [&str; 5] = [
    DATE_COLUMN,
    CITY_COLUMN,
    PRODUCT_LINE_COLUMN,
    CUSTOMER_TYPE_COLUMN,
    TOTAL_COLUMN,
];

/// A calendar month, ordered chronologically
///
/// Displays as `YYYY-MM`, so the textual form sorts the same way as the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    // field order matters for the derived Ord
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The columns of a CSV row the pipeline cares about, still as text
#[derive(Deserialize, Debug)]
pub(crate) struct RawSalesRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Product line")]
    pub product_line: String,
    #[serde(rename = "Customer type")]
    pub customer_type: String,
    #[serde(rename = "Total")]
    pub total: String,
}

/// One transaction of the sales dataset
///
/// Records are immutable once loaded: the month is derived from the date at
/// construction and nothing can change either afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    date: NaiveDate,
    month: Month,
    city: String,
    product_line: String,
    customer_type: String,
    total: Decimal,
    /// The full row as it was read, used for passthrough columns and export
    raw: StringRecord,
}

impl SalesRecord {
    /// Builds a record holding only the required columns, in `REQUIRED_COLUMNS` order
    pub fn new(
        date: NaiveDate,
        city: impl Into<String>,
        product_line: impl Into<String>,
        customer_type: impl Into<String>,
        total: Decimal,
    ) -> Self {
        let city = city.into();
        let product_line = product_line.into();
        let customer_type = customer_type.into();
        let raw = StringRecord::from(vec![
            date.format("%Y-%m-%d").to_string(),
            city.clone(),
            product_line.clone(),
            customer_type.clone(),
            total.to_string(),
        ]);

        Self::with_raw(date, city, product_line, customer_type, total, raw)
    }

    pub(crate) fn with_raw(
        date: NaiveDate,
        city: String,
        product_line: String,
        customer_type: String,
        total: Decimal,
        raw: StringRecord,
    ) -> Self {
        Self {
            date,
            month: Month::of(date),
            city,
            product_line,
            customer_type,
            total,
            raw,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn product_line(&self) -> &str {
        &self.product_line
    }

    pub fn customer_type(&self) -> &str {
        &self.customer_type
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// All the fields of the row, including the ones the pipeline ignores
    pub fn raw(&self) -> &StringRecord {
        &self.raw
    }
}
