//! CLI tool to parse a `select statistics` report.
//!
//! Usage:
//!   selstat <report.txt>
//!   selstat <report.txt> --code 4 --code 8 --format json -o failures.json
//!   sel stat ... | selstat -
//!
//! If no output file is specified, writes to stdout.

use clap::{Parser, ValueEnum};
use selstat::{
    CodeTally, SummaryStat, known_record_ids, parse_statistics, render_json, render_record_ids,
    render_tally, render_text, write_output,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Parse a Connect:Direct select statistics report into records.
#[derive(Parser)]
#[command(name = "selstat")]
struct Cli {
    /// Report file, or `-` for stdin
    #[arg(required_unless_present = "list_codes")]
    input: Option<String>,

    /// Only show process records with this completion code (repeatable)
    #[arg(short, long = "code", value_name = "CCODE")]
    codes: Vec<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print completion code counts of the selected records instead of the records
    #[arg(short, long)]
    summary: bool,

    /// Print the known record codes and exit
    #[arg(long)]
    list_codes: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("selstat={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(input)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = if cli.list_codes {
        render_record_ids(known_record_ids())
    } else {
        let input = cli.input.as_deref().unwrap_or("-");
        let report = match read_input(input) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading report '{input}': {e}");
                process::exit(1);
            }
        };

        let stats = match parse_statistics(&report) {
            Ok(stats) => stats,
            Err(e) => {
                eprintln!("Parse error in '{input}': {e}");
                process::exit(1);
            }
        };

        let selected: Vec<&SummaryStat> = if cli.codes.is_empty() {
            stats.iter().collect()
        } else {
            stats.by_codes(&cli.codes)
        };
        debug!(parsed = stats.len(), selected = selected.len(), "records");

        if cli.summary {
            let tally = CodeTally::from_stats(selected.iter().copied());
            match cli.format {
                Format::Text => render_tally(&tally),
                Format::Json => match serde_json::to_string_pretty(&tally) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Error encoding summary: {e}");
                        process::exit(1);
                    }
                },
            }
        } else {
            match cli.format {
                Format::Text => render_text(selected),
                Format::Json => match render_json(selected) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Error encoding records: {e}");
                        process::exit(1);
                    }
                },
            }
        }
    };

    if let Some(out_path) = &cli.output {
        if let Err(e) = write_output(out_path, &output) {
            eprintln!("Error writing output file '{}': {e}", out_path.display());
            process::exit(1);
        }
    } else {
        if let Err(e) = io::stdout().write_all(output.as_bytes()) {
            eprintln!("Error writing output: {e}");
            process::exit(1);
        }
        if !output.is_empty() && !output.ends_with('\n') {
            println!();
        }
    }
}
