use std::{io::Write, sync::Arc};

use log::*;

use crate::{
    aggregate::Aggregates,
    dataset::Dataset,
    error::Result,
    export,
    filter::{self, FilterSelection},
    records::SalesRecord,
};

/// One user's view of the shared dataset
///
/// Holds nothing but the current filter selection, every answer is computed
/// from (dataset, selection) on request.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
}

impl Session {
    /// Starts with every observed category value selected
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = FilterSelection::all(&dataset);
        Self { dataset, selection }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_filter<C, P, T>(&mut self, cities: C, product_lines: P, customer_types: T)
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.set_selection(FilterSelection::new(cities, product_lines, customer_types));
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        debug!("Filter selection changed: {:?}", selection);
        self.selection = selection;
    }

    /// Goes back to every observed value
    pub fn reset_filter(&mut self) {
        self.set_selection(FilterSelection::all(&self.dataset));
    }

    pub fn filtered_records(&self) -> Vec<&SalesRecord> {
        filter::filter(self.dataset.records(), &self.selection)
    }

    pub fn aggregates(&self) -> Aggregates {
        let records = self.filtered_records();
        if records.is_empty() {
            info!("Current selection matches no sales records");
        }
        Aggregates::compute(&records)
    }

    /// Writes the filtered records as CSV with the dataset's own columns
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        export::write_csv(writer, self.dataset.headers(), &self.filtered_records())
    }
}
