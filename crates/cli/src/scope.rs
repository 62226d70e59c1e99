//! Which saved periods a command sees, given the configured company.

use models::PeriodKey;

/// Keeps the periods of `company`, or every period when no company is set.
pub fn keys_in_scope(keys: Vec<PeriodKey>, company: Option<&str>) -> Vec<PeriodKey> {
    keys.into_iter()
        .filter(|key| company.is_none() || key.company.as_deref() == company)
        .collect()
}

/// One `meter list` line, written so it can be passed straight back to
/// `show`: the bare month when a company is configured, otherwise the month
/// followed by the `--company` flag it needs.
pub fn list_line(key: &PeriodKey, company: Option<&str>) -> String {
    match (&key.company, company) {
        (Some(own), None) => format!("{}  [--company \"{own}\"]", key.month),
        _ => key.month.clone(),
    }
}
