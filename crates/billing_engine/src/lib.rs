//! Billing computation over period tables and cross-period comparisons.
//!
//! The calculator is pure; comparison helpers read periods through any
//! [`record_store::RecordStore`] and recompute them before summing.

pub mod calculator;
pub mod compare;
pub mod rollover;

pub use calculator::{coerce_number, round_to, Calculator};
pub use compare::{compare, period_total, summarize};
pub use rollover::{next_month_label, rollover};
