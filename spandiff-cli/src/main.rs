//! spandiff - structural XML diff with source line attribution
//!
//! Command line front end for the xml-spandiff library.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xml_spandiff::{
    format_document, group_blocks, remove_lines, replace_lines, DiffOutcome, FormatOptions,
    PositionIndex, Snapshot, Verdict, DEFAULT_INDENT,
};

/// Exit status when a document is not well-formed.
const EXIT_MALFORMED: u8 = 2;

/// Structural XML diff with source line attribution
#[derive(Parser)]
#[command(name = "spandiff")]
#[command(version)]
#[command(about = "Structural XML diff with source line attribution", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the line range of every element, or of one path
    #[command(visible_alias = "i")]
    Index {
        /// XML file
        file: String,
        /// Positional path to look up, e.g. /RDF[1]/Class[2]
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List structural differences between two documents
    #[command(visible_alias = "d")]
    Diff {
        /// Control (reference) file
        control: String,
        /// Test (candidate) file
        test: String,
    },

    /// Report differences as line ranges of the control document
    #[command(visible_alias = "r")]
    Report {
        /// Control (reference) file
        control: String,
        /// Test (candidate) file
        test: String,
        /// Print the control document grouped into highlighted blocks
        #[arg(short, long)]
        blocks: bool,
    },

    /// Re-indent a document
    #[command(visible_alias = "f")]
    Format {
        /// XML file
        file: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Spaces per nesting level
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,
        /// Put each namespace declaration on its own line
        #[arg(long)]
        namespaces_on_new_line: bool,
    },

    /// Replace or remove a range of lines
    Fix {
        /// File to edit
        file: String,
        /// First line to replace (1-based)
        #[arg(short, long)]
        start: usize,
        /// Last line to replace (inclusive)
        #[arg(short, long)]
        end: usize,
        /// File holding the replacement text
        #[arg(long = "with", value_name = "FILE", required_unless_present = "remove")]
        replacement: Option<String>,
        /// Delete the lines instead
        #[arg(long, conflicts_with = "replacement")]
        remove: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Index { file, path } => run_index(&file, path.as_deref()),
        Commands::Diff { control, test } => run_diff(&control, &test),
        Commands::Report {
            control,
            test,
            blocks,
        } => run_report(&control, &test, blocks),
        Commands::Format {
            file,
            output,
            indent,
            namespaces_on_new_line,
        } => {
            let options = FormatOptions {
                indent,
                namespaces_on_new_line,
                ..FormatOptions::default()
            };
            run_format(&file, output.as_deref(), &options)
        }
        Commands::Fix {
            file,
            start,
            end,
            replacement,
            remove,
            output,
        } => run_fix(
            &file,
            start,
            end,
            replacement.as_deref().filter(|_| !remove),
            output.as_deref(),
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Opens the output file, or stdout.
fn output_writer(output_path: Option<&str>) -> io::Result<Box<dyn Write>> {
    Ok(match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

/// Prints the position index of a file.
fn run_index(path: &str, lookup: Option<&str>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("Indexing: {}", path);
    let xml = fs::read_to_string(path)?;
    let index = PositionIndex::build(&xml)?;

    if let Some(lookup) = lookup {
        return match index.lookup(lookup) {
            Some(range) => {
                println!("{}\t{}", lookup, range);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("No element at {}", lookup);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut out = io::stdout().lock();
    for (element, range) in index.sorted() {
        writeln!(out, "{}\t{}", element, range)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints every structural difference.
fn run_diff(control_path: &str, test_path: &str) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("Parsing control: {}", control_path);
    let control = fs::read_to_string(control_path)?;
    info!("Parsing test: {}", test_path);
    let test = fs::read_to_string(test_path)?;

    match xml_spandiff::diff(&control, &test) {
        DiffOutcome::NoDifferences => {
            info!("No differences.");
            Ok(ExitCode::SUCCESS)
        }
        DiffOutcome::Differences(differences) => {
            let mut out = io::stdout().lock();
            for difference in &differences {
                writeln!(out, "{}", difference)?;
            }
            info!("{} differences.", differences.len());
            Ok(ExitCode::FAILURE)
        }
        DiffOutcome::Malformed(malformed) => {
            eprintln!("Error: {}", malformed);
            Ok(ExitCode::from(EXIT_MALFORMED))
        }
    }
}

/// Verifies test against control and prints the error records.
fn run_report(
    control_path: &str,
    test_path: &str,
    blocks: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("Parsing control: {}", control_path);
    let control = fs::read_to_string(control_path)?;
    info!("Parsing test: {}", test_path);
    let test = fs::read_to_string(test_path)?;

    let verdict = if control.trim().is_empty() {
        xml_spandiff::report(&control, &test)
    } else {
        match Snapshot::new(control.as_str()) {
            Ok(snapshot) => snapshot.report(&test),
            Err(error) => {
                eprintln!("Error: control document is malformed: {}", error);
                return Ok(ExitCode::from(EXIT_MALFORMED));
            }
        }
    };

    match verdict {
        Verdict::Valid => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Verdict::Invalid(errors) => {
            let mut out = io::stdout().lock();
            if blocks {
                let line_count = control.lines().count();
                for block in group_blocks(line_count, &errors) {
                    let marker = if block.error.is_some() { '!' } else { ' ' };
                    for (offset, line) in block.lines(&control).enumerate() {
                        writeln!(out, "{}{:>5} | {}", marker, block.start_line + offset, line)?;
                    }
                    if let Some(error) = block.error {
                        writeln!(out, "       = {}", error.details)?;
                    }
                }
            } else {
                for error in &errors {
                    writeln!(out, "{}", error)?;
                }
            }
            info!("{} errors.", errors.len());
            Ok(ExitCode::FAILURE)
        }
        Verdict::Malformed(malformed) => {
            eprintln!("Error: {}", malformed);
            Ok(ExitCode::from(EXIT_MALFORMED))
        }
    }
}

/// Re-indents a document.
fn run_format(
    path: &str,
    output_path: Option<&str>,
    options: &FormatOptions,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("Formatting: {}", path);
    let xml = fs::read_to_string(path)?;
    let formatted = format_document(&xml, options)?;

    let mut output = output_writer(output_path)?;
    output.write_all(formatted.as_bytes())?;
    output.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Replaces or removes a line range.
fn run_fix(
    path: &str,
    start: usize,
    end: usize,
    replacement_path: Option<&str>,
    output_path: Option<&str>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let edited = match replacement_path {
        Some(replacement_path) => {
            info!("Replacing lines {}-{} of {}", start, end, path);
            let replacement = fs::read_to_string(replacement_path)?;
            replace_lines(&text, start, end, &replacement)?
        }
        None => {
            info!("Removing lines {}-{} of {}", start, end, path);
            remove_lines(&text, start, end)?
        }
    };

    let mut output = output_writer(output_path)?;
    output.write_all(edited.as_bytes())?;
    output.flush()?;
    Ok(ExitCode::SUCCESS)
}
