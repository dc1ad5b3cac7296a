use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use startmenu_cleaner::{
    known_start_menu_programs_folders, CleanReport, CleanerConfig, CleanerOptions, Cleaner,
    LnkShortcutResolver,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove installer cruft from Start Menu program folders",
    long_about = None
)]
struct Args {
    /// Root folders to clean (defaults to the Start Menu "Programs" folders)
    paths: Vec<PathBuf>,

    /// Simulate all file operations
    #[arg(long, short)]
    simulate: bool,

    /// Enable debug information in console
    #[arg(long, short)]
    debug: bool,

    /// Wait for Enter before exiting
    #[arg(long, short)]
    wait: bool,

    /// Configuration file (defaults to <config dir>/startmenucleaner/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Additional folder names to leave untouched (can be repeated)
    #[arg(long, short)]
    ignore: Vec<String>,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "trace" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn print_summary(report: &CleanReport, simulate: bool) {
    if report.is_empty() {
        return;
    }

    println!();
    let verb = if simulate { "Would clean" } else { "Cleaned" };
    for item in &report.claimed {
        let failed = report.failures.iter().any(|f| f.path == item.path);
        let line = format!("  {} [{}] {}", verb, item.cleaner_type, item.path.display());
        if failed {
            println!("{}", line.red());
        } else {
            println!("{}", line.green());
        }
    }

    let failures = report.failures.len().to_string().bold();
    let failures = if report.failures.is_empty() {
        failures
    } else {
        failures.red()
    };

    println!("========================================");
    println!(
        "Items: {}  Operations: {}  Failures: {}",
        report.claimed.len().to_string().bold(),
        report.operations.len().to_string().bold(),
        failures
    );
    for failure in &report.failures {
        println!("  {} {}: {}", "Failed".red(), failure.path.display(), failure.error);
    }
    if simulate {
        println!("Simulate mode: No files were changed.");
    }
}

fn run(args: &Args) -> Result<()> {
    let roots = if args.paths.is_empty() {
        if !cfg!(windows) {
            warn!("This operating system is not supported.");
            return Ok(());
        }
        known_start_menu_programs_folders()
    } else {
        args.paths.clone()
    };

    let config =
        CleanerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let options = CleanerOptions::with_ignored(
        roots,
        config.folders_to_ignore().iter().chain(&args.ignore),
    )
    .simulate(args.simulate);

    let cleaner = Cleaner::with_default_cleaners(options, Rc::new(LnkShortcutResolver), &config);
    let report = cleaner.start();

    print_summary(&report, args.simulate);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    info!("Starting");
    if args.debug {
        info!("Debug logging is enabled");
    }

    let result = run(&args);
    info!("Finished");

    if args.wait {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    result
}
