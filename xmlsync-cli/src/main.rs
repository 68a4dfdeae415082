// Command-line interface for xmlsync
//
// This binary provides commands for formatting and validating XML documents
// using the xmlsync document model.
//
// The core capabilities use the xmlsync crate: documents are parsed into a
// lossless structural tree and re-rendered by the canonical writer, so
// formatting never loses comments or unknown content.
//
// Usage:
//  xmlsync format <input> [--output <file>]   - Reformat a document
//  xmlsync check <input> [--json]             - Validate a document
//
// Both commands read xmlsync.toml from the working directory when present;
// --config points at an explicit configuration file.

use clap::{Arg, ArgAction, Command, ValueHint};
use std::fs;
use xmlsync::tree::{parse_document, parse_document_lenient};
use xmlsync::writer::{write_document, WriteOptions};
use xmlsync::{Diagnostic, PathSegment, Severity};
use xmlsync_config::{Loader, XmlsyncConfig};

fn build_cli() -> Command {
    Command::new("xmlsync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for formatting and validating XML documents")
        .long_about(
            "xmlsync is a command-line tool for working with XML documents\n\
            backed by the xmlsync synchronization engine.\n\n\
            Commands:\n  \
            - format: Parse a document and re-render it canonically\n  \
            - check:  Validate a document and report problems\n\n\
            Examples:\n  \
            xmlsync format sheet.xml                 # Format to stdout\n  \
            xmlsync format sheet.xml -o out.xml      # Format to a file\n  \
            xmlsync check sheet.xml --json           # Machine-readable report",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an xmlsync.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Reformat an XML document")
                .long_about(
                    "Parse the input document and re-render it with canonical\n\
                    indentation, attribute wrapping, and line breaks.\n\n\
                    Comments and all content are preserved; only whitespace is\n\
                    regenerated. Output goes to stdout unless -o is given.\n\n\
                    Examples:\n  \
                    xmlsync format sheet.xml                  # Format to stdout\n  \
                    xmlsync format sheet.xml -o sheet.xml     # Format in place",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate an XML document")
                .long_about(
                    "Parse the input document and report every problem found:\n\
                    malformed XML is an error, a missing XML declaration (when\n\
                    the configuration expects one) is a warning.\n\n\
                    The exit code is non-zero when errors are found, or when\n\
                    warnings are found and fail_on_warnings is set.\n\n\
                    Examples:\n  \
                    xmlsync check sheet.xml            # Human-readable report\n  \
                    xmlsync check sheet.xml --json     # JSON report",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit the report as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("fail-on-warnings")
                        .long("fail-on-warnings")
                        .help("Exit non-zero when warnings are found")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("format", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_format_command(input, output, &config);
        }
        Some(("check", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let json = sub_matches.get_flag("json");
            let fail_on_warnings =
                sub_matches.get_flag("fail-on-warnings") || config.check.fail_on_warnings;
            handle_check_command(input, json, fail_on_warnings, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the format command
fn handle_format_command(input: &str, output: Option<&str>, config: &XmlsyncConfig) {
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let document = parse_document(&source).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    let options: WriteOptions = (&config.formatting).into();
    let text = write_document(&document, &options);

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => {
            print!("{text}");
        }
    }
}

/// Handle the check command
fn handle_check_command(input: &str, json: bool, fail_on_warnings: bool, config: &XmlsyncConfig) {
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    // Findings are plain engine diagnostics, so both output modes share
    // one representation with a severity and a document path.
    let mut diagnostics = Vec::new();

    if let Err(message) = parse_document_lenient(&source) {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message,
            path: vec![PathSegment::Root],
        });
    }
    if config.formatting.declaration && !source.trim_start().starts_with("<?xml") {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: "Missing XML declaration".to_string(),
            path: vec![PathSegment::Root],
        });
    }

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    if json {
        let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) = diagnostics
            .iter()
            .partition(|d| d.severity == Severity::Error);
        let report = serde_json::json!({
            "errors": errors,
            "warnings": warnings,
        });
        println!("{report}");
    } else {
        for diagnostic in &diagnostics {
            eprintln!("{diagnostic}");
        }
        if diagnostics.is_empty() {
            println!("{input}: ok");
        }
    }

    if has_errors || (fail_on_warnings && has_warnings) {
        std::process::exit(1);
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> XmlsyncConfig {
    let loader = Loader::new().with_optional_file("xmlsync.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
