//! Supermarket sales dashboard core
//!
//! Loads a sales CSV once, then answers filter requests with the matching
//! records, their aggregates and a CSV export of them.

pub mod aggregate;
pub mod auth;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod records;
pub mod report;
pub mod salestoy;
pub mod session;

pub use aggregate::{Aggregates, Summary};
pub use dataset::Dataset;
pub use error::DashboardError;
pub use filter::FilterSelection;
pub use loader::{CsvSalesReader, DatasetLoader, SalesReader};
pub use records::{Month, SalesRecord};
pub use session::Session;
