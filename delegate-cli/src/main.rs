//! Delegate Scenario CLI Application
//!
//! Command-line driver for the delegate-core library. It loads a scenario
//! file describing listeners and a sequence of steps, then:
//! - Subscribes/unsubscribes listeners through registration views
//! - Fires a value-returning event and a heterogeneous-return event
//! - Prints what each step returned and what each listener observed

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod listeners;
mod report;
mod scenario;

/// Delegate Scenario Runner - Exercise multicast dispatch from a TOML file
#[derive(Parser, Debug)]
#[command(name = "delegate-cli")]
#[command(about = "Run subscribe/fire scenarios against the delegate engine", long_about = None)]
#[command(version)]
struct Args {
    /// Path to scenario file (scenario.toml)
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Delegate CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using delegate-core v{}", delegate_core::VERSION);

    let Some(scenario_path) = &args.scenario else {
        println!("Delegate Scenario Runner - No scenario specified");
        println!("\nQuick Start:");
        println!("  delegate-cli --scenario scenario.toml");
        println!("  delegate-cli --scenario scenario.toml --json");
        println!("\nUse --help for more options");
        return Ok(());
    };

    log::info!("Loading scenario from: {:?}", scenario_path);
    let config = config::load_config(scenario_path)?;
    log::debug!(
        "Scenario loaded: {} listener(s), {} step(s)",
        config.listeners.len(),
        config.steps.len()
    );

    let report = scenario::run(&config);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
