//! Gridform - apply spreadsheet formulas to a CSV sheet from the command line

mod config;
mod logger;

use anyhow::{Context, Result};
use gridform_core::storage::csv::write_csv_to;
use gridform_core::{CellCoord, Document, Evaluation};
use gridform_engine::builtins::FUNCTIONS;
use gridform_engine::engine::MAX_COLUMNS;
use std::env;
use std::path::{Path, PathBuf};

fn print_usage() {
    eprintln!("Usage: gridform [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    CSV sheet to open");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --eval <CELL>=<FORMULA>  Apply a formula at CELL (can be repeated)");
    eprintln!("  -o, --output <FILE>       Write the sheet (.md for markdown, otherwise CSV)");
    eprintln!("  -w, --write               Save the sheet back to FILE");
    eprintln!("  --rows <N>                Initial number of rows");
    eprintln!("  --cols <N>                Initial number of columns (max 26)");
    eprintln!("  --config <FILE>           Load settings from a TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  --list-functions          List supported formula functions");
    eprintln!("  -v, --verbose             Log evaluation details to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    file_path: Option<PathBuf>,
    evals: Vec<String>,
    output: Option<PathBuf>,
    write_back: bool,
    rows: Option<usize>,
    cols: Option<usize>,
    config_file: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
    ListFunctions,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--list-functions" => return Ok(Command::ListFunctions),
            "-e" | "--eval" => {
                i += 1;
                let value = args.get(i).ok_or("--eval requires <CELL>=<FORMULA>")?;
                opts.evals.push(value.clone());
            }
            "-o" | "--output" => {
                i += 1;
                let value = args.get(i).ok_or("--output requires a file path")?;
                opts.output = Some(PathBuf::from(value));
            }
            "-w" | "--write" => opts.write_back = true,
            "--rows" => {
                i += 1;
                opts.rows = Some(parse_count(args.get(i), "--rows")?);
            }
            "--cols" => {
                i += 1;
                let cols = parse_count(args.get(i), "--cols")?;
                if cols > MAX_COLUMNS {
                    return Err(format!("--cols must be at most {}", MAX_COLUMNS));
                }
                opts.cols = Some(cols);
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or("--config requires a file path")?;
                opts.config_file = Some(PathBuf::from(value));
            }
            "--no-config" => opts.no_config = true,
            "-v" | "--verbose" => opts.verbose = true,
            arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            arg => {
                if opts.file_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                opts.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    if opts.write_back && opts.file_path.is_none() {
        return Err("--write requires a FILE".to_string());
    }
    Ok(Command::Run(opts))
}

fn parse_count(value: Option<&String>, flag: &str) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{} requires a number", flag))?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{} expects a positive number, got '{}'", flag, value)),
    }
}

/// Split `B4=SUM(A1:A3)` into the target cell and the formula text.
fn parse_assignment(assignment: &str) -> Result<(CellCoord, &str)> {
    let (label, formula) = assignment
        .split_once('=')
        .with_context(|| format!("expected <CELL>=<FORMULA>, got '{}'", assignment))?;
    let target = label
        .trim()
        .parse::<CellCoord>()
        .with_context(|| format!("invalid target cell in '{}'", assignment))?;
    Ok((target, formula))
}

fn list_functions() {
    for spec in FUNCTIONS {
        println!("{:<48} {}", spec.usage, spec.description);
    }
}

fn run(opts: Options) -> Result<()> {
    let (config, warnings) = if opts.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(opts.config_file.as_ref())
    };
    for warning in warnings {
        log::warn!("{}", warning);
    }

    let rows = opts.rows.unwrap_or(config.rows);
    let cols = opts.cols.unwrap_or(config.cols);
    let mut doc = Document::with_file(opts.file_path.clone(), rows, cols)
        .context("failed to open sheet")?
        .with_options(config.eval_options());

    for assignment in &opts.evals {
        let (target, formula) = parse_assignment(assignment)?;
        let evaluation = doc
            .apply_formula(&target, formula)
            .with_context(|| format!("failed to evaluate '{}'", assignment))?;
        match evaluation {
            Evaluation::Scalar(value) => log::debug!("{} = {}", target, value),
            Evaluation::RowsRemoved(rows) => log::debug!("removed {} rows", rows.len()),
            Evaluation::CellsReplaced(n) => log::debug!("replaced text in {} cells", n),
            Evaluation::Ignored => {}
        }
    }

    if let Some(output) = &opts.output {
        write_output(&doc, output)?;
    }
    if opts.write_back {
        let path = doc.save()?;
        log::debug!("saved {}", path.display());
    }
    if opts.output.is_none() && !opts.write_back {
        let stdout = std::io::stdout();
        write_csv_to(&mut stdout.lock(), &doc.grid)?;
    }
    Ok(())
}

fn write_output(doc: &Document, path: &Path) -> Result<()> {
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if is_markdown {
        doc.export_markdown(path)?;
    } else {
        doc.save_csv(path)?;
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let opts = match parse_args(&args) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Ok(Command::ListFunctions) => {
            list_functions();
            return;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(1);
        }
    };

    logger::init(opts.verbose);
    if let Err(e) = run(opts) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
