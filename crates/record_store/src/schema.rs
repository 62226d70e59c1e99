//! Canonical column schema of period files and the mapping of older header
//! spellings onto it.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use models::{BillingRow, RawRow, COLUMNS};
use std::collections::HashSet;
use std::io::{Read, Write};

/// Maps a header as found in a file onto its canonical column name.
///
/// Matching ignores case, spaces and punctuation, so `Amount_Due/Total`,
/// `amount due` and `AmountDue` all resolve to `Amount Due`. Returns `None`
/// for columns that have no place in the canonical schema (e.g. `No.`).
pub fn canonical_header(raw: &str) -> Option<&'static str> {
    let key: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    let column = match key.as_str() {
        "name" | "customer" | "customername" => "Name",
        "previous" | "previousreading" | "prev" => "Previous",
        "current" | "currentreading" | "currentornewmeter" => "Current",
        "newmeter" | "adjustment" => "New Meter",
        "rate" | "unitprice" => "Rate",
        "consumption" | "consumptiontotal1" | "total1" | "1sttotal" | "firsttotal" => {
            "Consumption"
        }
        "amountdue" | "amountduetotal" | "2ndtotal" | "secondtotal" | "total" => "Amount Due",
        "amountpaid" | "paid" => "Amount Paid",
        "balance" => "Balance",
        _ => return None,
    };
    debug_assert!(COLUMNS.contains(&column));
    Some(column)
}

/// Rewrites a header record onto canonical names. The first column mapping to
/// a canonical name wins; later duplicates and unknown columns get a name the
/// row model ignores.
fn canonical_headers(headers: &StringRecord) -> StringRecord {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, raw)| match canonical_header(raw) {
            Some(column) if seen.insert(column) => column.to_string(),
            _ => format!("_ignored_{idx}"),
        })
        .collect()
}

/// Reads period rows from any CSV source, accepting legacy headers and
/// filling absent columns with empty text.
pub fn read_rows<R: Read>(reader: R) -> csv::Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = canonical_headers(rdr.headers()?);
    rdr.set_headers(headers);

    rdr.deserialize::<RawRow>().collect()
}

/// Writes computed rows under the canonical header. The header is written even
/// when there are no rows.
pub fn write_rows<W: Write>(writer: W, rows: &[BillingRow]) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_legacy_spellings() {
        assert_eq!(canonical_header("CurrentOrNewMeter"), Some("Current"));
        assert_eq!(canonical_header("Consumption/Total1"), Some("Consumption"));
        assert_eq!(canonical_header("Amount_Due/Total"), Some("Amount Due"));
        assert_eq!(canonical_header("1st Total"), Some("Consumption"));
        assert_eq!(canonical_header("2nd Total"), Some("Amount Due"));
        assert_eq!(canonical_header("AmountPaid"), Some("Amount Paid"));
        assert_eq!(canonical_header("new meter"), Some("New Meter"));
        assert_eq!(canonical_header("No."), None);
    }

    #[test]
    fn test_read_rows_maps_legacy_file() {
        let csv = "No.,Name,Current,Previous,New Meter,1st Total,Rate,2nd Total,Amount Paid,Balance\n\
                   1,Jane,142,100,,42,135,5670,4000,1670\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Jane");
        assert_eq!(row.previous, "100");
        assert_eq!(row.current, "142");
        assert_eq!(row.new_meter, "");
        assert_eq!(row.consumption, "42");
        assert_eq!(row.amount_due, "5670");
        assert_eq!(row.amount_paid, "4000");
    }

    #[test]
    fn test_read_rows_fills_absent_columns() {
        let csv = "Name,Previous\nBob,N/A\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].previous, "N/A");
        assert_eq!(rows[0].rate, "");
        assert_eq!(rows[0].balance, "");
    }

    #[test]
    fn test_read_rows_short_record() {
        let csv = "Name,Previous,Current,Rate\nAmy,10\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].previous, "10");
        assert_eq!(rows[0].current, "");
    }

    #[test]
    fn test_read_rows_duplicate_mapping_keeps_first() {
        let csv = "Name,CurrentOrNewMeter,Current\nAmy,7,9\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].current, "7");
    }

    #[test]
    fn test_write_rows_empty_still_has_header() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.trim_end(),
            "Name,Previous,Current,New Meter,Rate,Consumption,Amount Due,Amount Paid,Balance"
        );
    }

    #[test]
    fn test_write_then_read_keeps_names_with_commas() {
        let rows = vec![BillingRow {
            name: "Otieno, J.".into(),
            current_reading: 12.5,
            ..BillingRow::default()
        }];
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows).unwrap();

        let back = read_rows(buf.as_slice()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, "Otieno, J.");
        assert_eq!(back[0].current, "12.5");
    }
}
