use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canonical header of every period file, in write order.
pub const COLUMNS: [&str; 9] = [
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

// Settings models
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Precision {
	/// Decimal places kept on consumption. `None` disables rounding.
	pub consumption: Option<u32>,
	/// Decimal places kept on amount due, balance and totals.
	pub money: Option<u32>,
}

impl Default for Precision {
	fn default() -> Self {
		Self { consumption: Some(3), money: Some(2) }
	}
}

impl Precision {
	/// No rounding at all; derived values are the raw products.
	pub fn exact() -> Self {
		Self { consumption: None, money: None }
	}
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub data_dir: PathBuf,
	pub company: Option<String>,
	/// Rate applied when a row carries no usable rate.
	pub default_rate: f64,
	pub precision: Precision,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("data"),
			company: None,
			default_rate: 0.0,
			precision: Precision::default(),
		}
	}
}

// Raw input rows
/// A row exactly as typed by the operator or read from disk. Every cell is
/// text; numeric coercion happens in the calculator.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RawRow {
	#[serde(rename = "Name")]
	pub name: String,
	#[serde(rename = "Previous")]
	pub previous: String,
	#[serde(rename = "Current")]
	pub current: String,
	#[serde(rename = "New Meter")]
	pub new_meter: String,
	#[serde(rename = "Rate")]
	pub rate: String,
	#[serde(rename = "Consumption")]
	pub consumption: String,
	#[serde(rename = "Amount Due")]
	pub amount_due: String,
	#[serde(rename = "Amount Paid")]
	pub amount_paid: String,
	#[serde(rename = "Balance")]
	pub balance: String,
}

impl RawRow {
	pub fn new(name: &str) -> Self {
		Self { name: name.to_string(), ..Self::default() }
	}

	pub fn with_readings(mut self, previous: &str, current: &str) -> Self {
		self.previous = previous.to_string();
		self.current = current.to_string();
		self
	}

	pub fn with_rate(mut self, rate: &str) -> Self {
		self.rate = rate.to_string();
		self
	}

	pub fn with_paid(mut self, paid: &str) -> Self {
		self.amount_paid = paid.to_string();
		self
	}

	pub fn with_new_meter(mut self, adjustment: &str) -> Self {
		self.new_meter = adjustment.to_string();
		self
	}
}

// Computed rows
/// One customer's entry for one billing period with derived fields filled in.
/// Field order matches [`COLUMNS`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BillingRow {
	#[serde(rename = "Name")]
	pub name: String,
	#[serde(rename = "Previous")]
	pub previous_reading: f64,
	#[serde(rename = "Current")]
	pub current_reading: f64,
	#[serde(rename = "New Meter")]
	pub adjustment: f64,
	#[serde(rename = "Rate")]
	pub rate: f64,
	#[serde(rename = "Consumption")]
	pub consumption: f64,
	#[serde(rename = "Amount Due")]
	pub amount_due: f64,
	#[serde(rename = "Amount Paid")]
	pub amount_paid: f64,
	#[serde(rename = "Balance")]
	pub balance: f64,
}

impl From<&BillingRow> for RawRow {
	fn from(row: &BillingRow) -> Self {
		Self {
			name: row.name.clone(),
			previous: row.previous_reading.to_string(),
			current: row.current_reading.to_string(),
			new_meter: row.adjustment.to_string(),
			rate: row.rate.to_string(),
			consumption: row.consumption.to_string(),
			amount_due: row.amount_due.to_string(),
			amount_paid: row.amount_paid.to_string(),
			balance: row.balance.to_string(),
		}
	}
}

// Period keys
/// Identifies one billing period: an optional company and a free-text month label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PeriodKey {
	pub company: Option<String>,
	pub month: String,
}

impl PeriodKey {
	pub fn new(company: Option<&str>, month: &str) -> Self {
		Self {
			company: company
				.map(str::trim)
				.filter(|c| !c.is_empty())
				.map(str::to_string),
			month: month.trim().to_string(),
		}
	}

	pub fn month(month: &str) -> Self {
		Self::new(None, month)
	}

	/// Display label, e.g. `Kitengela August 2025`.
	pub fn label(&self) -> String {
		match &self.company {
			Some(company) => format!("{} {}", company, self.month),
			None => self.month.clone(),
		}
	}
}

impl fmt::Display for PeriodKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.label())
	}
}

// Output models
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodTotals {
	pub rows: usize,
	pub consumption: f64,
	pub amount_due: f64,
	pub amount_paid: f64,
	pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthTotal {
	pub key: PeriodKey,
	pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
	pub first: MonthTotal,
	pub second: MonthTotal,
	/// `second.total - first.total`
	pub difference: f64,
}
