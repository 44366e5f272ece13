//! Command-line front end for risk and price runs.
//!
//! Loads `<input-data-path>/<as-of-date>.json`, prices the instrument described
//! in the `--instrument` file and prints the result.
//!
//! ```text
//! bsm-risk --mode RISK --instrument data/instruments/aapl_call.json \
//!     --as-of-date 20250102 --input-data-path data/market --verbose I
//! ```

use bsm_pricer::prelude::*;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Price and Greeks
    #[value(name = "RISK", alias = "risk")]
    Risk,
    /// Price only
    #[value(name = "PRICE", alias = "price")]
    Price,
}

#[derive(Parser)]
#[command(name = "bsm-risk")]
#[command(about = "Black-Scholes-Merton pricing and risk for European options")]
struct Args {
    /// Mode of operation
    #[arg(long, value_enum, default_value = "RISK")]
    mode: Mode,

    /// Instrument description (JSON file)
    #[arg(long)]
    instrument: PathBuf,

    /// Valuation date, YYYYMMDD
    #[arg(long)]
    as_of_date: String,

    /// Directory holding market data files named YYYYMMDD.json
    #[arg(long)]
    input_data_path: PathBuf,

    /// Logging: I for INFO, D for DEBUG; disabled otherwise
    #[arg(long)]
    verbose: Option<String>,

    /// Write the risk report as CSV to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the checksummed risk report package as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Logging verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Info,
    Debug,
    Disabled,
}

impl Verbosity {
    fn parse(flag: Option<&str>) -> Self {
        match flag.map(str::to_ascii_uppercase).as_deref() {
            Some("I") => Verbosity::Info,
            Some("D") => Verbosity::Debug,
            _ => Verbosity::Disabled,
        }
    }

    fn max_level(self) -> Level {
        match self {
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Disabled => Level::WARN,
        }
    }

    fn sink(self) -> SharedSink {
        match self {
            Verbosity::Info => TracingSink::shared(DiagnosticLevel::Info),
            Verbosity::Debug => TracingSink::shared(DiagnosticLevel::Debug),
            Verbosity::Disabled => NoopSink::shared(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Verbosity::Info => "INFO",
            Verbosity::Debug => "DEBUG",
            Verbosity::Disabled => "DISABLED",
        }
    }
}

fn print_banner(title: &str) {
    println!("========================================");
    println!("    {title}");
    println!("========================================");
}

fn print_report(report: &RiskReport) {
    print_banner("RISK MODE OUTPUT");
    for (name, value) in report.flat_fields() {
        println!("{name}: {value}");
    }
    println!("========================================");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let verbosity = Verbosity::parse(args.verbose.as_deref());

    tracing_subscriber::fmt()
        .with_max_level(verbosity.max_level())
        .init();

    print_banner("BSM PRICER");
    println!("Logging Level: {}", verbosity.label());

    let as_of = parse_date(&args.as_of_date)?;
    let instrument = InstrumentDescription::from_file(&args.instrument)?;
    let market_data = load_market_data(&args.input_data_path, as_of)?;
    let sink = verbosity.sink();

    match args.mode {
        Mode::Risk => {
            info!("Running RISK mode as of {}", as_of);
            let report = run_risk_mode(&instrument, as_of, &market_data, sink)?;
            print_report(&report);

            if let Some(path) = &args.output {
                report.write_csv(path)?;
                println!("CSV written to {}", path.display());
            }
            if let Some(path) = &args.report {
                let package = RiskReportPackage::new(report)?;
                fs::write(path, package.to_json()?)?;
                println!("Report package written to {}", path.display());
            }
        }
        Mode::Price => {
            info!("Running PRICE mode as of {}", as_of);
            let price = run_price_mode(&instrument, as_of, &market_data, sink)?;
            print_banner("PRICE MODE OUTPUT");
            println!("price: {price}");
        }
    }

    Ok(())
}
