use models::{Comparison, MonthTotal, PeriodKey};
use record_store::RecordStore;
use tracing::debug;

use crate::calculator::Calculator;

/// Sum of amount due for one period, recomputed from its input columns.
pub fn period_total<S: RecordStore + ?Sized>(
    store: &S,
    calculator: &Calculator,
    key: &PeriodKey,
) -> MonthTotal {
    let rows = calculator.compute(&store.load(key));
    let total = calculator.totals(&rows).amount_due;
    debug!(key = %key, rows = rows.len(), total, "period total");
    MonthTotal {
        key: key.clone(),
        total,
    }
}

/// Totals of two periods and `total(second) - total(first)`.
pub fn compare<S: RecordStore + ?Sized>(
    store: &S,
    calculator: &Calculator,
    first: &PeriodKey,
    second: &PeriodKey,
) -> Comparison {
    let first = period_total(store, calculator, first);
    let second = period_total(store, calculator, second);
    let difference = calculator.round_money(second.total - first.total);
    Comparison {
        first,
        second,
        difference,
    }
}

/// Totals of every given period, sorted by display label.
pub fn summarize<S: RecordStore + ?Sized>(
    store: &S,
    calculator: &Calculator,
    keys: &[PeriodKey],
) -> Vec<MonthTotal> {
    let mut out: Vec<MonthTotal> = keys
        .iter()
        .map(|key| period_total(store, calculator, key))
        .collect();
    out.sort_by(|a, b| a.key.label().cmp(&b.key.label()));
    out
}
