use std::path::PathBuf;

use clap::Parser;
use log::*;

use crate::{
    auth::{Credential, StaticCredentials},
    dataset::Dataset,
    filter::FilterSelection,
    loader::CsvSalesReader,
};

pub const DEFAULT_DATA_PATH: &str = "supermarket_sales - Sheet1.csv";

/// Supermarket sales dashboard: filter, summarize and export sales data
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// CSV file with the sales data
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Only keep these cities (repeatable, all cities when omitted)
    #[arg(long = "city", value_name = "CITY")]
    pub cities: Vec<String>,

    /// Only keep these product lines (repeatable, all when omitted)
    #[arg(long = "product-line", value_name = "LINE")]
    pub product_lines: Vec<String>,

    /// Only keep these customer types (repeatable, all when omitted)
    #[arg(long = "customer-type", value_name = "TYPE")]
    pub customer_types: Vec<String>,

    /// chrono format of the Date column, tried in order (repeatable)
    #[arg(long = "date-format", value_name = "FMT")]
    pub date_formats: Vec<String>,

    /// Export the filtered rows as CSV, to a dated file name if no path is given
    #[arg(long, value_name = "PATH")]
    pub export: Option<Option<PathBuf>>,

    /// Number of filtered rows to preview
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Log in as this user before showing anything
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, requires = "user")]
    pub password: Option<String>,

    /// Accepted `user:password` pairs (repeatable)
    #[arg(long = "credentials", value_name = "USER:PASSWORD")]
    pub credentials: Vec<Credential>,
}

impl Config {
    pub fn reader(&self) -> CsvSalesReader {
        if self.date_formats.is_empty() {
            CsvSalesReader::new()
        } else {
            CsvSalesReader::with_date_formats(self.date_formats.iter().cloned())
        }
    }

    pub fn credentials(&self) -> StaticCredentials {
        self.credentials.iter().cloned().collect()
    }

    /// The selection asked for on the command line, any omitted dimension allows everything
    pub fn selection(&self, dataset: &Dataset) -> FilterSelection {
        FilterSelection::new(
            pick("City", &self.cities, dataset.cities()),
            pick("Product line", &self.product_lines, dataset.product_lines()),
            pick("Customer type", &self.customer_types, dataset.customer_types()),
        )
    }
}

fn pick(column: &str, chosen: &[String], observed: Vec<&str>) -> Vec<String> {
    if chosen.is_empty() {
        return observed.into_iter().map(String::from).collect();
    }

    for value in chosen {
        if !observed.contains(&value.as_str()) {
            warn!("{} `{}` does not appear in the data", column, value);
        }
    }
    chosen.to_vec()
}
