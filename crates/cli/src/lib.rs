//! Terminal front end for the meter ledger. The `meter` binary lives in
//! `src/bin/meter.rs`; this library holds its text rendering and the company scoping of saved
//! periods.

pub mod render;
pub mod scope;
