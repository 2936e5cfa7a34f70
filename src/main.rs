// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use bmi_tracker::{BmiRecord, Config, CsvStore, Tracker};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Body Mass Index calculator with per-user history")]
struct Cli {
    /// CSV file holding all records (default: $BMI_DATA_FILE, then ./bmi_data.csv)
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Without a subcommand the interactive form starts
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate BMI and append the record
    Add {
        #[arg(long)]
        name: String,
        /// Weight in kilograms
        #[arg(long, allow_hyphen_values = true)]
        weight: String,
        /// Height in metres
        #[arg(long, allow_hyphen_values = true)]
        height: String,
    },
    /// Show every record for a name (case-insensitive)
    History {
        #[arg(long)]
        name: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the BMI series for a name in date order
    Trend {
        #[arg(long)]
        name: String,
    },
    /// Delete ALL records for a name. Cannot be undone.
    Clear {
        #[arg(long)]
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.data);
    log::debug!("Using data file {:?}", config.data_file());

    let tracker = Tracker::new(CsvStore::new(config.data_file()))
        .with_context(|| format!("Failed to open BMI data file {:?}", config.data_file()))?;

    match cli.command {
        None => run_ui_mode(tracker),
        Some(Command::Add { name, weight, height }) => run_add(tracker, &name, &weight, &height),
        Some(Command::History { name, json }) => run_history(&tracker, &name, json),
        Some(Command::Trend { name }) => run_trend(&tracker, &name),
        Some(Command::Clear { name, yes }) => run_clear(tracker, &name, yes),
    }
}

fn run_add(mut tracker: Tracker<CsvStore>, name: &str, weight: &str, height: &str) -> Result<()> {
    let record = tracker.submit(name, weight, height)?;
    println!("{}", record.classification());
    println!("✓ Saved for {} at {}", record.name(), record.date_string());
    Ok(())
}

fn run_history(tracker: &Tracker<CsvStore>, name: &str, json: bool) -> Result<()> {
    let records = tracker.history(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No history found for this user.");
        return Ok(());
    }

    println!("{}'s BMI History", name.trim());
    println!("{:<20} {:>8} {:>8} {:>7}  {}", "Date", "Weight", "Height", "BMI", "Category");
    for rec in &records {
        print_row(rec);
    }
    println!("{} records", records.len());

    Ok(())
}

fn print_row(rec: &BmiRecord) {
    println!(
        "{:<20} {:>8} {:>8} {:>7.2}  {}",
        rec.date_string(),
        rec.weight_kg(),
        rec.height_m(),
        rec.bmi(),
        rec.category()
    );
}

fn run_trend(tracker: &Tracker<CsvStore>, name: &str) -> Result<()> {
    let trend = tracker.trend(name)?;
    if trend.is_empty() {
        println!("No data to plot.");
        return Ok(());
    }

    println!("BMI Trend for {}", name.trim());
    for point in trend.points() {
        println!(
            "{}  {:>6.2}  {}",
            point.timestamp.format(bmi_tracker::DATE_FORMAT),
            point.bmi,
            point.category
        );
    }

    if let (Some(lo), Some(hi), Some(change)) = (trend.min_bmi(), trend.max_bmi(), trend.change()) {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Min {:.2} | Max {:.2} | Change {:+.2}", lo, hi, change);
    }

    Ok(())
}

fn run_clear(mut tracker: Tracker<CsvStore>, name: &str, yes: bool) -> Result<()> {
    let pending = tracker.pending_deletion(name)?;
    if pending == 0 {
        println!("No history found for {}.", name.trim());
        return Ok(());
    }

    if !yes && !confirm(&format!(
        "Are you sure you want to delete all history for '{}'? ({} records) [y/N] ",
        name.trim(),
        pending
    ))? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = tracker.clear(name)?;
    println!("✓ History for '{}' has been cleared ({} records).", name.trim(), removed);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}

#[cfg(feature = "tui")]
fn run_ui_mode(tracker: Tracker<CsvStore>) -> Result<()> {
    let mut app = ui::App::new(tracker);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_tracker: Tracker<CsvStore>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: bmi-tracker add --name NAME --weight KG --height M");
    std::process::exit(1);
}
