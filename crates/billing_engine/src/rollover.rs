//! Starting a new billing month from the previous one.

use chrono::{Months, NaiveDate};
use models::{BillingRow, RawRow};

/// Builds the opening table of the next month: same customers and rates, this
/// month's current reading becomes both readings of the new month, so an
/// untouched row bills nothing. Payments and any new-meter offset are cleared.
pub fn rollover(rows: &[BillingRow]) -> Vec<RawRow> {
    rows.iter()
        .map(|row| {
            let closing = row.current_reading.to_string();
            RawRow {
                name: row.name.clone(),
                previous: closing.clone(),
                current: closing,
                rate: row.rate.to_string(),
                ..RawRow::default()
            }
        })
        .collect()
}

/// Label of the month after `label`, e.g. `August 2025` -> `September 2025`.
/// Accepts underscores in place of spaces and any letter case. Returns None if
/// the label is not a `<Month name> <year>` pair.
pub fn next_month_label(label: &str) -> Option<String> {
    let normalized = label.replace('_', " ");
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    let first = NaiveDate::parse_from_str(&format!("1 {normalized}"), "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("1 {normalized}"), "%d %b %Y"))
        .ok()?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.format("%B %Y").to_string())
}
