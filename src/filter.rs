use hashbrown::HashSet;

use crate::{dataset::Dataset, records::SalesRecord};

/// The category values a user currently allows
///
/// A record passes when its city, product line and customer type are all
/// allowed. An empty set on any dimension lets nothing through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    cities: HashSet<String>,
    product_lines: HashSet<String>,
    customer_types: HashSet<String>,
}

impl FilterSelection {
    pub fn new<C, P, T>(cities: C, product_lines: P, customer_types: T) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            product_lines: product_lines.into_iter().map(Into::into).collect(),
            customer_types: customer_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Allows every value observed in the dataset, the starting point of a session
    pub fn all(dataset: &Dataset) -> Self {
        Self::new(
            dataset.cities(),
            dataset.product_lines(),
            dataset.customer_types(),
        )
    }

    pub fn cities(&self) -> &HashSet<String> {
        &self.cities
    }

    pub fn product_lines(&self) -> &HashSet<String> {
        &self.product_lines
    }

    pub fn customer_types(&self) -> &HashSet<String> {
        &self.customer_types
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.cities.contains(record.city())
            && self.product_lines.contains(record.product_line())
            && self.customer_types.contains(record.customer_type())
    }
}

/// Keeps the records allowed by `selection`, in their original order
pub fn filter<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn dataset() -> Dataset {
        let date = NaiveDate::from_ymd_opt(2019, 1, 5).unwrap();
        let rows = [
            ("Yangon", "Food", "Member", 10),
            ("Mandalay", "Food", "Normal", 20),
            ("Yangon", "Sports", "Normal", 30),
            ("Naypyitaw", "Sports", "Member", 40),
            ("Yangon", "Food", "Normal", 50),
        ];

        Dataset::from_records(
            rows.iter()
                .map(|(city, line, kind, total)| {
                    SalesRecord::new(date, *city, *line, *kind, Decimal::from(*total))
                })
                .collect(),
        )
    }

    fn totals(records: &[&SalesRecord]) -> Vec<Decimal> {
        records.iter().map(|r| r.total()).collect()
    }

    #[test]
    fn test_all_selection_keeps_everything() {
        let dataset = dataset();
        let selection = FilterSelection::all(&dataset);

        let filtered = filter(dataset.records(), &selection);
        let expected: Vec<&SalesRecord> = dataset.records().iter().collect();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_and_across_or_within() {
        let dataset = dataset();
        let selection = FilterSelection::new(
            vec!["Yangon", "Mandalay"],
            vec!["Food"],
            vec!["Member", "Normal"],
        );

        let filtered = filter(dataset.records(), &selection);
        assert_eq!(totals(&filtered), vec![10.into(), 20.into(), 50.into()]);
    }

    #[test]
    fn test_empty_dimension_matches_nothing() {
        let dataset = dataset();
        let selection = FilterSelection::new(
            dataset.cities(),
            Vec::<String>::new(),
            dataset.customer_types(),
        );

        assert!(filter(dataset.records(), &selection).is_empty());
    }

    #[test]
    fn test_unknown_values_never_match() {
        let dataset = dataset();
        let selection = FilterSelection::new(vec!["Bangkok"], vec!["Food"], vec!["Member"]);

        assert!(filter(dataset.records(), &selection).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = dataset();
        let selection = FilterSelection::new(vec!["Yangon"], vec!["Food", "Sports"], vec!["Normal"]);

        let once = filter(dataset.records(), &selection);
        let twice = filter(once.iter().copied(), &selection);
        assert_eq!(once, twice);
        assert_eq!(totals(&twice), vec![30.into(), 50.into()]);
    }
}
