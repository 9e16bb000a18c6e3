//! The VHDL formatter CLI.
//!
//! Provides the `vhdlfmt` command with the following subcommands:
//!
//! - `vhdlfmt verify <original> <formatted>` - Check that a formatted file
//!   denotes the same design as its original
//! - `vhdlfmt config [path]` - Load, validate and print the formatter
//!   configuration
//!
//! Options:
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//!
//! Logging goes to stderr and is controlled by `VHDLFMT_LOG` (default `warn`).

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vhdl_common::error::LexError;
use vhdl_common::span::Span;
use vhdl_fmt::verify::{self, Side, TokenStream, VerifyError};
use vhdl_fmt::FormatConfig;
use vhdl_lexer::Lexer;

#[derive(Parser)]
#[command(name = "vhdlfmt", version, about = "The VHDL formatter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a formatted file is equivalent to its original
    Verify {
        /// The source as it was before formatting
        original: PathBuf,

        /// The formatted source
        formatted: PathBuf,

        /// Output diagnostics as JSON (one object per line) instead of human-readable format
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long = "no-color")]
        no_color: bool,
    },
    /// Load, validate and print the formatter configuration
    Config {
        /// TOML configuration file; defaults are printed when omitted
        path: Option<PathBuf>,
    },
}

struct DiagnosticOptions {
    color: bool,
    json: bool,
}

/// One loaded source file.
struct SourceFile {
    path: PathBuf,
    text: String,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Verify {
            original,
            formatted,
            json,
            no_color,
        } => {
            let diag_opts = DiagnosticOptions {
                color: !no_color && !json,
                json,
            };
            verify_files(&original, &formatted, &diag_opts)
        }
        Commands::Config { path } => print_config(path.as_deref()),
    };

    if !ok {
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VHDLFMT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Run the equivalence check over two files. Returns whether they match.
fn verify_files(original: &Path, formatted: &Path, diag_opts: &DiagnosticOptions) -> bool {
    let (original, formatted) = match (read_source(original), read_source(formatted)) {
        (Ok(original), Ok(formatted)) => (original, formatted),
        (Err(e), _) | (_, Err(e)) => {
            report_error(&e, diag_opts);
            return false;
        }
    };

    let (original_tokens, original_errors) = Lexer::tokenize_with_errors(&original.text);
    let (formatted_tokens, formatted_errors) = Lexer::tokenize_with_errors(&formatted.text);
    report_lex_errors(&original, &original_errors, diag_opts);
    report_lex_errors(&formatted, &formatted_errors, diag_opts);

    let original_stream = TokenStream::new(&original.text, original_tokens);
    let formatted_stream = TokenStream::new(&formatted.text, formatted_tokens);
    debug!(
        original = original_stream.tokens().len(),
        formatted = formatted_stream.tokens().len(),
        "tokenized"
    );

    match verify::ensure_safety(&original_stream, &formatted_stream) {
        Ok(()) => {
            if diag_opts.json {
                println!("{}", serde_json::json!({ "equivalent": true }));
            } else {
                println!(
                    "{} is equivalent to {}",
                    formatted.path.display(),
                    original.path.display()
                );
            }
            true
        }
        Err(e) => {
            report_verify_error(&e, &original, &formatted, diag_opts);
            false
        }
    }
}

fn read_source(path: &Path) -> Result<SourceFile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        text,
    })
}

/// Report a failed equivalence check against the file it points into.
fn report_verify_error(
    error: &VerifyError,
    original: &SourceFile,
    formatted: &SourceFile,
    diag_opts: &DiagnosticOptions,
) {
    let (side, token) = error.primary();
    let file = match side {
        Side::Original => original,
        Side::Formatted => formatted,
    };
    let span = byte_range(token.span);
    let (label, note) = match error {
        VerifyError::Mismatch { original, .. } => (
            "differs from the original".to_string(),
            Some(format!("the original has {original}")),
        ),
        VerifyError::Leftover { side, .. } => (
            format!("no counterpart in the {} text", side.other()),
            None,
        ),
    };

    if diag_opts.json {
        let json_diag = serde_json::json!({
            "code": "V0001",
            "severity": "error",
            "message": error.to_string(),
            "file": file.path.display().to_string(),
            "spans": [{
                "start": span.start,
                "end": span.end,
                "label": label
            }],
            "detail": serde_json::to_value(error).unwrap_or_default(),
            "fix": null
        });
        eprintln!("{}", json_diag);
    } else {
        use ariadne::{Label, Report, ReportKind, Source};
        let mut report = Report::<Range<usize>>::build(ReportKind::Error, span.clone())
            .with_code("V0001")
            .with_message(error.to_string())
            .with_config(ariadne_config(diag_opts))
            .with_label(Label::new(span).with_message(label));
        if let Some(note) = note {
            report = report.with_note(note);
        }
        eprintln!("{}:", file.path.display());
        let _ = report.finish().eprint(Source::from(file.text.as_str()));
    }
}

/// Lexical errors do not stop the check: both sides are compared with their
/// `Error` tokens in place.
fn report_lex_errors(file: &SourceFile, errors: &[LexError], diag_opts: &DiagnosticOptions) {
    for error in errors {
        let span = byte_range(error.span);
        if diag_opts.json {
            let json_diag = serde_json::json!({
                "code": "L0001",
                "severity": "warning",
                "message": error.to_string(),
                "file": file.path.display().to_string(),
                "spans": [{
                    "start": span.start,
                    "end": span.end,
                    "label": error.to_string()
                }],
                "fix": null
            });
            eprintln!("{}", json_diag);
        } else {
            use ariadne::{Label, Report, ReportKind, Source};
            eprintln!("{}:", file.path.display());
            let _ = Report::<Range<usize>>::build(ReportKind::Warning, span.clone())
                .with_code("L0001")
                .with_message("Lexical error")
                .with_config(ariadne_config(diag_opts))
                .with_label(Label::new(span).with_message(error.to_string()))
                .finish()
                .eprint(Source::from(file.text.as_str()));
        }
    }
}

fn report_error(message: &str, diag_opts: &DiagnosticOptions) {
    if diag_opts.json {
        let msg = serde_json::json!({
            "code": "V0002",
            "severity": "error",
            "message": message,
            "file": "",
            "spans": [],
            "fix": null
        });
        eprintln!("{}", msg);
    } else {
        eprintln!("error: {}", message);
    }
}

fn ariadne_config(diag_opts: &DiagnosticOptions) -> ariadne::Config {
    ariadne::Config::default()
        .with_color(diag_opts.color)
        .with_index_type(ariadne::IndexType::Byte)
}

/// Zero-width spans still get one column so the label has something to
/// point at.
fn byte_range(span: Span) -> Range<usize> {
    let range = span.range();
    range.start..range.end.max(range.start + 1)
}

/// Print the resolved configuration as TOML.
fn print_config(path: Option<&Path>) -> bool {
    let config = match path {
        Some(path) => FormatConfig::from_file(path),
        None => Ok(FormatConfig::default()),
    };
    match config.and_then(|config| config.to_toml_string()) {
        Ok(text) => {
            print!("{}", text);
            true
        }
        Err(e) => {
            eprintln!("error: {}", e);
            false
        }
    }
}
