//! ps2rfp - turns a price-sheet workbook into an RFP copy.

mod config;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use ps2rfp_core::{XlsxStore, sanitize};

const PROMPT: &str = "COPY AND PASTE EXCEL FILEPATH HERE: ";

fn print_usage() {
    eprintln!("Usage: ps2rfp [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Price sheet to convert (.xlsx or .xlsm)");
    eprintln!("                            Prompted for when omitted");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rules <FILE>            Load rules from TOML file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for more detail.");
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn prompt_for_path() -> Result<String> {
    print!("{}", PROMPT);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read file path")?;
    if read == 0 || line.trim().is_empty() {
        bail!("No file path given.");
    }
    Ok(line)
}

fn run(file: Option<String>, rules_file: Option<PathBuf>) -> Result<PathBuf> {
    let raw = match file {
        Some(file) => file,
        None => prompt_for_path()?,
    };
    let input = config::clean_input_path(&raw);

    let (rules, warnings) = config::load_rules(rules_file.as_ref());
    for warning in warnings {
        warn!("{}", warning);
    }

    let report = sanitize(&input, &rules, &XlsxStore::new())?;
    if !report.warnings.is_empty() {
        warn!(
            "{} cell/shape operation(s) were skipped.",
            report.warnings.len()
        );
    }
    info!(
        "Cleared {} cell(s), restored {} shape(s).",
        report.cells_cleared, report.shapes_restored
    );
    Ok(report.output)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut rules_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--rules" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --rules requires a file path");
                    std::process::exit(1);
                }
                rules_file = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with("--") => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file.is_none() {
                    file = Some(args[i].clone());
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    init_logging();

    match run(file, rules_file) {
        Ok(output) => println!("[SUCCESS] Saved edited file to:\n{}", output.display()),
        Err(e) => {
            println!("[ERROR] {:#}", e);
            std::process::exit(1);
        }
    }
}
