//! Plain-text views for the terminal: the period table and the month bar chart.

use models::{BillingRow, MonthTotal, PeriodTotals};

const HEADERS: [&str; 10] = [
    "No.",
    "Name",
    "Previous",
    "Current",
    "New Meter",
    "Rate",
    "Consumption",
    "Amount Due",
    "Amount Paid",
    "Balance",
];

/// Formats an amount with two decimals and thousands separators, e.g. `12,420.00`.
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

fn format_reading(value: f64) -> String {
    // Drop a trailing ".0" so whole readings print as typed.
    let s = format!("{value}");
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// Renders rows as an aligned table numbered from 1, followed by the totals line.
pub fn render_table(rows: &[BillingRow], totals: &PeriodTotals) -> String {
    let mut cells: Vec<[String; 10]> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        cells.push([
            (idx + 1).to_string(),
            row.name.clone(),
            format_reading(row.previous_reading),
            format_reading(row.current_reading),
            format_reading(row.adjustment),
            format_money(row.rate),
            format_reading(row.consumption),
            format_money(row.amount_due),
            format_money(row.amount_paid),
            format_money(row.balance),
        ]);
    }

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for line in &cells {
        let formatted: Vec<String> = line
            .iter()
            .zip(widths.iter())
            .enumerate()
            // Name column left-aligned, numbers right-aligned.
            .map(|(col, (cell, &w))| {
                if col == 1 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect();
        out.push_str(formatted.join(" | ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} rows | consumption {} | total due {} | paid {} | balance {}\n",
        totals.rows,
        format_reading(totals.consumption),
        format_money(totals.amount_due),
        format_money(totals.amount_paid),
        format_money(totals.balance),
    ));
    out
}

/// Horizontal bar chart, one line per month, bars scaled to the largest
/// absolute total. Negative totals draw with `-` instead of `#`.
pub fn render_bar_chart(items: &[MonthTotal], width: usize) -> String {
    let label_width = items
        .iter()
        .map(|m| m.key.label().chars().count())
        .max()
        .unwrap_or(0);
    let max = items.iter().map(|m| m.total.abs()).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for item in items {
        let len = if max > 0.0 {
            ((item.total.abs() / max) * width as f64).round() as usize
        } else {
            0
        };
        let glyph = if item.total < 0.0 { "-" } else { "#" };
        out.push_str(&format!(
            "{:<label_width$} | {:<width$} {}\n",
            item.key.label(),
            glyph.repeat(len),
            format_money(item.total),
        ));
    }
    out
}
