use std::{fmt::Display, io::Write};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    aggregate::{sort_by_total, Aggregates},
    records::SalesRecord,
};

/// Dollar amount with two decimals and thousands separators, e.g. `$1,234.56`
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// The average, or `n/a` when nothing was selected
pub fn format_mean(mean: Option<Decimal>) -> String {
    mean.map(format_currency).unwrap_or_else(|| "n/a".to_string())
}

/// Writes the dashboard for one selection as plain text
/// `preview_rows` caps the table of filtered records
pub fn render<W: Write>(
    out: &mut W,
    aggregates: &Aggregates,
    records: &[&SalesRecord],
    preview_rows: usize,
) -> std::io::Result<()> {
    writeln!(out, "Key Metrics")?;
    writeln!(out, "  Total Sales:  {:>16}", format_currency(aggregates.summary.total))?;
    writeln!(out, "  Average Sale: {:>16}", format_mean(aggregates.summary.mean))?;
    writeln!(out)?;

    writeln!(
        out,
        "Filtered Sales Data ({} of {} rows)",
        records.len().min(preview_rows),
        records.len()
    )?;
    writeln!(
        out,
        "  {:<10}  {:<12}  {:<24}  {:<13}  {:>12}",
        "Date", "City", "Product line", "Customer type", "Total"
    )?;
    for record in records.iter().take(preview_rows) {
        writeln!(
            out,
            "  {:<10}  {:<12}  {:<24}  {:<13}  {:>12}",
            record.date().format("%Y-%m-%d").to_string(),
            record.city(),
            record.product_line(),
            record.customer_type(),
            format_currency(record.total())
        )?;
    }
    writeln!(out)?;

    // cities are ranked the way the bar chart shows them
    render_groups(out, "Total Sales by City", &sort_by_total(aggregates.by_city.clone()))?;
    render_groups(out, "Total Sales by Product Line", &aggregates.by_product_line)?;
    render_groups(out, "Monthly Sales Trend", &aggregates.by_month)?;

    Ok(())
}

fn render_groups<W: Write, K: Display>(
    out: &mut W,
    title: &str,
    groups: &[(K, Decimal)],
) -> std::io::Result<()> {
    writeln!(out, "{}", title)?;
    if groups.is_empty() {
        writeln!(out, "  (no data)")?;
    }
    for (key, sum) in groups {
        writeln!(out, "  {:<24}  {:>16}", key.to_string(), format_currency(*sum))?;
    }
    writeln!(out)
}
