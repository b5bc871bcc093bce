use std::hash::Hash;

use hashbrown::HashMap;
use rust_decimal::Decimal;

use crate::records::{Month, SalesRecord};

/// Total and average sale of a set of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: Decimal,
    /// `None` when there are no records to average over
    pub mean: Option<Decimal>,
}

/// Everything the dashboard shows for one filter selection
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub summary: Summary,
    pub by_city: Vec<(String, Decimal)>,
    pub by_product_line: Vec<(String, Decimal)>,
    /// Ascending by calendar month
    pub by_month: Vec<(Month, Decimal)>,
}

impl Aggregates {
    pub fn compute(records: &[&SalesRecord]) -> Self {
        Self {
            summary: total_and_mean(records),
            by_city: sum_by_city(records),
            by_product_line: sum_by_product_line(records),
            by_month: sum_by_month(records),
        }
    }
}

pub fn total_and_mean(records: &[&SalesRecord]) -> Summary {
    let total: Decimal = records.iter().map(|r| r.total()).sum();
    let mean = match records.len() {
        0 => None,
        count => Some(total / Decimal::from(count)),
    };

    Summary { total, mean }
}

/// Sums the totals of every group `key` puts records in
/// One entry per distinct key, ascending by key
pub fn sum_by_key<K, F>(records: &[&SalesRecord], key: F) -> Vec<(K, Decimal)>
where
    K: Ord + Hash,
    F: Fn(&SalesRecord) -> K,
{
    let mut groups: HashMap<K, Decimal> = HashMap::new();
    for &record in records {
        *groups.entry(key(record)).or_insert(Decimal::ZERO) += record.total();
    }

    let mut sums: Vec<(K, Decimal)> = groups.into_iter().collect();
    sums.sort_by(|(a, _), (b, _)| a.cmp(b));
    sums
}

pub fn sum_by_city(records: &[&SalesRecord]) -> Vec<(String, Decimal)> {
    sum_by_key(records, |r| r.city().to_owned())
}

pub fn sum_by_product_line(records: &[&SalesRecord]) -> Vec<(String, Decimal)> {
    sum_by_key(records, |r| r.product_line().to_owned())
}

pub fn sum_by_month(records: &[&SalesRecord]) -> Vec<(Month, Decimal)> {
    sum_by_key(records, SalesRecord::month)
}

/// Reorders grouped sums from the smallest sum to the largest, ties keep their order
pub fn sort_by_total<K>(mut sums: Vec<(K, Decimal)>) -> Vec<(K, Decimal)> {
    sums.sort_by(|(_, a), (_, b)| a.cmp(b));
    sums
}
