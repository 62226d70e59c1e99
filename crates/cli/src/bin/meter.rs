use anyhow::{anyhow, bail, Context, Result};
use billing_engine::{compare, next_month_label, rollover, summarize, Calculator};
use clap::{Parser, Subcommand};
use cli::render::{format_money, render_bar_chart, render_table};
use cli::scope::{keys_in_scope, list_line};
use models::{PeriodKey, Settings};
use record_store::{read_rows, FileRecordStore, RecordStore};
use std::{fs::File, path::PathBuf};
use tracing::info;

const CHART_WIDTH: usize = 40;

/// Monthly meter readings: compute bills, save months, compare totals.
#[derive(Parser, Debug)]
#[command(name = "meter", author, version, about = "Monthly meter readings and billing totals", long_about = None)]
struct Args {
    /// Path to settings.json (falls back to ./settings.json, then defaults)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Directory holding one CSV per month (overrides settings)
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Company name prefixed to every month (overrides settings)
    #[arg(short, long)]
    company: Option<String>,

    /// Rate used when a row has none (overrides settings)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Debug logging for the meter crates
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a saved month with recomputed totals
    Show { month: String },

    /// Compute rows from an edited CSV and save them as a month
    Save {
        month: String,
        /// CSV with at least Name, Previous, Current, Rate, Amount Paid columns
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Start a new month, optionally carrying readings over from an earlier one
    NewMonth {
        /// Month to create; defaults to the month after --from
        month: Option<String>,
        /// Month whose current readings become the new previous readings
        #[arg(long)]
        from: Option<String>,
        /// Overwrite the month if it was already saved
        #[arg(long)]
        force: bool,
    },

    /// List saved months
    List,

    /// Compare the total amount due of two months
    Compare { first: String, second: String },

    /// Bar chart of the total amount due across all saved months
    Summary,
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())?;
    if let Some(dir) = &args.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(company) = &args.company {
        settings.company = Some(company.clone());
    }
    if let Some(rate) = args.rate {
        settings.default_rate = rate;
    }
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::default_directive(args.verbose));

    let settings = resolve_settings(&args)?;
    let store = FileRecordStore::new(&settings.data_dir);
    let calc = Calculator::from_settings(&settings);
    let key_for = |month: &str| PeriodKey::new(settings.company.as_deref(), month);
    info!(data_dir = %settings.data_dir.display(), "using record store");

    match args.command {
        Command::Show { month } => {
            let key = key_for(&month);
            let rows = calc.compute(&store.load(&key));
            if rows.is_empty() {
                println!("No rows saved for {key}.");
                return Ok(());
            }
            println!("{key}\n");
            print!("{}", render_table(&rows, &calc.totals(&rows)));
        }

        Command::Save { month, input } => {
            let key = key_for(&month);
            // Reject before reading anything when the key is unusable.
            let path = store.key_to_path(&key)?;
            let file = File::open(&input)
                .with_context(|| format!("Cannot open {}", input.display()))?;
            let raw = read_rows(file)
                .with_context(|| format!("Reading rows from {}", input.display()))?;

            let rows = calc.compute(&raw);
            store
                .save(&key, &rows)
                .with_context(|| format!("Failed to save {key}"))?;
            print!("{}", render_table(&rows, &calc.totals(&rows)));
            println!("Data saved to {}", path.display());
        }

        Command::NewMonth { month, from, force } => {
            let month = month
                .or_else(|| from.as_deref().and_then(next_month_label))
                .ok_or_else(|| anyhow!("Please give the new month's name (e.g. \"September 2025\")"))?;
            let key = key_for(&month);
            let path = store.key_to_path(&key)?;
            if path.exists() && !force {
                bail!("{key} is already saved at {}; use --force to reset it", path.display());
            }

            let opening = match &from {
                Some(previous) => {
                    let previous_key = key_for(previous);
                    let previous_rows = calc.compute(&store.load(&previous_key));
                    if previous_rows.is_empty() {
                        bail!("Nothing saved for {previous_key} to carry over");
                    }
                    rollover(&previous_rows)
                }
                None => Vec::new(),
            };

            let rows = calc.compute(&opening);
            store
                .save(&key, &rows)
                .with_context(|| format!("Failed to save {key}"))?;
            println!(
                "Started {key} with {} customers at {}",
                rows.len(),
                path.display()
            );
        }

        Command::List => {
            let company = settings.company.as_deref();
            let keys = keys_in_scope(store.list_keys()?, company);
            if keys.is_empty() {
                println!("No saved months found yet.");
            }
            for key in &keys {
                println!("{}", list_line(key, company));
            }
        }

        Command::Compare { first, second } => {
            let result = compare(&store, &calc, &key_for(&first), &key_for(&second));
            println!("{:<24} {:>16}", result.first.key.label(), format_money(result.first.total));
            println!("{:<24} {:>16}", result.second.key.label(), format_money(result.second.total));
            println!("{:<24} {:>16}", "Difference", format_money(result.difference));
            print!("\n{}", render_bar_chart(&[result.first, result.second], CHART_WIDTH));
        }

        Command::Summary => {
            let keys = keys_in_scope(store.list_keys()?, settings.company.as_deref());
            if keys.is_empty() {
                println!("No saved months found yet.");
                return Ok(());
            }
            print!("{}", render_bar_chart(&summarize(&store, &calc, &keys), CHART_WIDTH));
        }
    }

    Ok(())
}
