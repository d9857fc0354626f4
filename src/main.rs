/// fstring_rewriter - flags f-string literals and suggests %-style rewrites
///
/// The main entry point. It parses command-line arguments, resolves the file
/// to scan and prints the report. The scanned file is never modified.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use log::{error, LevelFilter};

use fstring_rewriter::config::{load_config, Config};
use fstring_rewriter::utils::output_formatter;
use fstring_rewriter::{FileAuditor, Report};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "fstring_rewriter",
    version,
    about = "Flags f-string literals and suggests %-style rewrites",
    long_about = "Scans a source file for f-string literals and proposes a rewrite for each one:
- logger.info(f\"Loaded {n}\")  ->  logger.info(\"Loaded %s\", n)
- print(f\"Value: {x}\")      ->  print(\"Value: %s\" % (x))
- msg = f\"Hello {name}\"     ->  msg = \"Hello %s\" % (name)
The file itself is never modified."
)]
struct Args {
    /// File to scan (default: file_manager.py, or default_file from --config)
    #[arg(value_name = "FILE")]
    file_path: Option<String>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Export the report to a JSON file
    #[arg(long = "json")]
    json: Option<String>,

    /// Export the report to a CSV file
    #[arg(long = "csv")]
    csv: Option<String>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show only summary information
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Path to configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<String>,
}

/// Main entry point function
fn main() -> Result<()> {
    let args = Args::parse();

    let _ = setup_logging(&args);

    let config = load_config(args.config.as_deref().map(Path::new));
    let target = resolve_target(&args, &config);

    let auditor = FileAuditor::new(&config);
    let report = match auditor.audit_file(&target) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            eprintln!("Usage: fstring_rewriter [FILE]  (default: {})", config.default_file);
            eprintln!("Run with --help for usage information");
            process::exit(1);
        }
    };

    export_results(&report, &args)?;

    if !args.quiet {
        print!(
            "{}",
            output_formatter::format_report(&report, args.md, args.summary_only)
        );
    }

    Ok(())
}

/// Set up logging to stderr or to the requested log file
fn setup_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        let file = File::create(log_file)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;

    Ok(())
}

/// Positional argument first, then the configured default
fn resolve_target(args: &Args, config: &Config) -> PathBuf {
    match &args.file_path {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(&config.default_file),
    }
}

/// Write the JSON/CSV exports requested on the command line
fn export_results(report: &Report, args: &Args) -> Result<()> {
    if let Some(json_path) = &args.json {
        output_formatter::export_report_json(report, Path::new(json_path))?;
    }

    if let Some(csv_path) = &args.csv {
        output_formatter::create_csv_report(report, Path::new(csv_path))?;
    }

    Ok(())
}
