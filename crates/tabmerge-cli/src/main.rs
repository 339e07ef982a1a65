//! tabmerge CLI
//!
//! Merges CSV files and HTML tables that share an identifier column into a
//! single CSV file.

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tabmerge_core::{InputStatus, MergeConfig, MergeReport, RecordMerger};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tabmerge")]
#[command(about = "Merge CSV and HTML tables by a shared ID column", long_about = None)]
#[command(version)]
struct Cli {
    /// Input files (.csv or .html), merged in the order given
    files: Vec<PathBuf>,

    /// Output CSV file [env: TABMERGE_OUTPUT_FILE, default: combined.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the identifier column [env: TABMERGE_ID_COLUMN, default: ID]
    #[arg(long)]
    id_column: Option<String>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the merged table to stdout
    #[arg(long)]
    print: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    }

    init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> tabmerge_core::Result<()> {
    let mut config = MergeConfig::from_env();
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(id_column) = cli.id_column {
        config.id_column = id_column;
    }

    let merger = RecordMerger::new(config)?;
    let report = merger.run(&cli.files)?;

    print_summary(&report);

    if cli.print {
        if let Some(table) = &report.merged {
            println!();
            println!("{}", table);
        }
    }

    if let Some(path) = cli.report {
        report.save(&path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &MergeReport) {
    println!(
        "Processed {} file(s): {} merged, {} skipped",
        report.inputs.len(),
        report.merged_count(),
        report.skipped_count()
    );
    for input in &report.inputs {
        match &input.status {
            InputStatus::Merged { rows, columns } => {
                println!("  {} ({} rows, {} columns)", input.path.display(), rows, columns);
            }
            InputStatus::Skipped { reason } => {
                println!("  {} [skipped: {}]", input.path.display(), reason);
            }
        }
    }

    if report.written {
        println!(
            "Wrote {} rows, {} columns to {}",
            report.row_count,
            report.column_count,
            report.output_path.display()
        );
    } else {
        println!("Nothing merged, {} not written", report.output_path.display());
    }
}
