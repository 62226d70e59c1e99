use models::{BillingRow, PeriodTotals, Precision, RawRow, Settings};

/// Turns raw rows into billing rows.
///
/// For every row, in this order:
/// `consumption = current - previous + new_meter`,
/// `amount_due = consumption * rate`,
/// `balance = amount_due - amount_paid`.
///
/// Never fails. Cells that do not parse as numbers fall back to 0, except the
/// rate which falls back to `default_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculator {
    pub default_rate: f64,
    pub precision: Precision,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            default_rate: 0.0,
            precision: Precision::default(),
        }
    }
}

impl Calculator {
    pub fn new(default_rate: f64, precision: Precision) -> Self {
        Self {
            default_rate,
            precision,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_rate, settings.precision)
    }

    /// Computes every row. Output has the same length and order as the input.
    pub fn compute(&self, rows: &[RawRow]) -> Vec<BillingRow> {
        rows.iter().map(|row| self.compute_row(row)).collect()
    }

    pub fn compute_row(&self, row: &RawRow) -> BillingRow {
        let previous_reading = coerce_number(&row.previous, 0.0);
        let current_reading = coerce_number(&row.current, 0.0);
        let adjustment = coerce_number(&row.new_meter, 0.0);
        let rate = coerce_number(&row.rate, self.default_rate);
        let amount_paid = coerce_number(&row.amount_paid, 0.0);

        let consumption = round_to(
            current_reading - previous_reading + adjustment,
            self.precision.consumption,
        );
        let amount_due = round_to(consumption * rate, self.precision.money);
        let balance = round_to(amount_due - amount_paid, self.precision.money);

        BillingRow {
            name: row.name.trim().to_string(),
            previous_reading,
            current_reading,
            adjustment,
            rate,
            consumption,
            amount_due,
            amount_paid,
            balance,
        }
    }

    /// Column sums of already computed rows, rounded to money precision.
    pub fn totals(&self, rows: &[BillingRow]) -> PeriodTotals {
        let mut totals = rows.iter().fold(PeriodTotals::default(), |mut acc, row| {
            acc.rows += 1;
            acc.consumption += row.consumption;
            acc.amount_due += row.amount_due;
            acc.amount_paid += row.amount_paid;
            acc.balance += row.balance;
            acc
        });
        totals.consumption = round_to(totals.consumption, self.precision.consumption);
        totals.amount_due = round_to(totals.amount_due, self.precision.money);
        totals.amount_paid = round_to(totals.amount_paid, self.precision.money);
        totals.balance = round_to(totals.balance, self.precision.money);
        totals
    }

    pub fn round_money(&self, value: f64) -> f64 {
        round_to(value, self.precision.money)
    }
}

/// Parses a cell as a number, substituting `default` for blanks, text and
/// non-finite values.
pub fn coerce_number(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Rounds half away from zero to `places` decimals; `None` leaves the value as is.
pub fn round_to(value: f64, places: Option<u32>) -> f64 {
    match places {
        Some(places) => {
            let factor = 10f64.powi(places as i32);
            (value * factor).round() / factor
        }
        None => value,
    }
}
