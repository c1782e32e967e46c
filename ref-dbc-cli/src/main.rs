//! Reference-to-DBC CLI Application
//!
//! Command-line front end for the ref-dbc-converter library. It adds:
//! - Input collection from `-i` and positional arguments
//! - Output path derivation (`<input stem>.dbc`)
//! - Optional TOML configuration
//! - Sequential or parallel processing of multiple files
//! - End-of-run summary and JSON report

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use ref_dbc_converter::{ConversionReport, Converter};
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod report;

use config::AppConfig;
use report::{FileOutcome, RunReport};

/// Reference-to-DBC - Convert reference files into DBC CAN databases
#[derive(Parser, Debug)]
#[command(name = "ref-to-dbc")]
#[command(about = "Convert reference files into DBC CAN databases", long_about = None)]
#[command(version)]
struct Args {
    /// Input file path (can be combined with positional arguments)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Input files
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Output file path (only used when a single input file is provided)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON report of the run
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Number of files to convert in parallel
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    jobs: usize,

    /// Never wait for Enter before exiting
    #[arg(long)]
    no_pause: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// All input files, `-i` first
    fn inputs(&self) -> Vec<PathBuf> {
        self.input
            .iter()
            .chain(self.files.iter())
            .cloned()
            .collect()
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::debug!("ref-to-dbc v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using converter library v{}", ref_dbc_converter::VERSION);

    match run(&args) {
        Ok(run) => {
            if run.had_issues() {
                log::warn!("Errors or warnings were issued during processing (see details above).");
                pause_if_interactive(args.no_pause);
            }
            if run.failed() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunReport> {
    let inputs = args.inputs();
    if inputs.is_empty() {
        anyhow::bail!("No input file specified. Use --help for usage.");
    }

    if inputs.len() > 1 && args.output.is_some() {
        log::warn!("-o flag is ignored when more than one input file is provided.");
    }

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let converter = Converter::with_config(app_config.conversion.clone());

    let jobs: Vec<(PathBuf, PathBuf)> = inputs
        .iter()
        .map(|input| {
            let output = match (&args.output, inputs.len()) {
                (Some(output), 1) => output.clone(),
                _ => app_config.output.output_path_for(input),
            };
            (input.clone(), output)
        })
        .collect();

    let outcomes: Vec<FileOutcome> = if args.jobs > 1 && jobs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build()
            .context("Failed to build worker pool")?;
        pool.install(|| {
            jobs.par_iter()
                .map(|(input, output)| process_file(&converter, input, output))
                .collect()
        })
    } else {
        jobs.iter()
            .map(|(input, output)| process_file(&converter, input, output))
            .collect()
    };

    let mut run = RunReport::default();
    for outcome in outcomes {
        run.push(outcome);
    }

    log::info!("--- Finished ---");
    log::info!("{}", run.summary());

    if let Some(path) = &args.report {
        run.write_json(path)?;
        log::info!("Report written to: {:?}", path);
    }

    Ok(run)
}

/// Convert one file and record the outcome
fn process_file(converter: &Converter, input: &Path, output: &Path) -> FileOutcome {
    log::info!("--- Processing file: {:?} ---", input);
    log::info!("Output will be written to: {:?}", output);

    let result = convert_one(converter, input, output);
    match &result {
        Ok(report) => log::info!(
            "{:?}: {} entries, {} messages, {} signals, {} warning(s)",
            input,
            report.entry_count,
            report.stats.num_messages,
            report.stats.num_signals,
            report.warnings.len()
        ),
        Err(e) => log::error!("ERROR processing {:?}: {:#}", input, e),
    }

    FileOutcome::from_result(input.to_path_buf(), output.to_path_buf(), &result)
}

fn convert_one(converter: &Converter, input: &Path, output: &Path) -> Result<ConversionReport> {
    converter
        .convert_file(input, output)
        .with_context(|| format!("Failed to convert {:?}", input))
}

/// Wait for Enter so a double-clicked console window stays readable
fn pause_if_interactive(disabled: bool) {
    if disabled || !io::stdin().is_terminal() {
        return;
    }

    eprintln!("Press Enter to exit.");
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
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
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
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
