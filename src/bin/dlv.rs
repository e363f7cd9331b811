//! Binary entry point for the downlevel CLI.
//!
//! The parser is external: `dlv` consumes the original source file plus the
//! ESTree JSON tree an external parser produced for it (esprima with
//! `range: true`, or compatible).
//!
//! ## Usage
//!
//! ```bash
//! # Desugar ES6 constructs, reading the tree from a file
//! dlv input.js --tree input.tree.json --es6
//!
//! # Pipe the tree in, strip trailing commas, target ES3
//! esparse --range input.js | dlv input.js --tree - --utility --target es3
//!
//! # Embed an inline source map
//! dlv input.js --tree input.tree.json --es6 --source-map-inline -o out.js
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use downlevel::error::DlvError;
use downlevel::text::byte_offset_to_position;
use downlevel::transform::{transform, Options, Target};
use downlevel::Node;

// ============================================================================
// CLI Structure
// ============================================================================

/// Formatting-preserving JavaScript desugaring.
///
/// Rewrites selected ES6 constructs into portable equivalents while keeping
/// every byte of untouched formatting, whitespace, and comments.
#[derive(Parser, Debug)]
#[command(name = "dlv", version, about = "Formatting-preserving JavaScript desugaring")]
struct Cli {
    /// Source file to transform.
    source: PathBuf,

    /// ESTree JSON tree for the source, produced by an external parser
    /// (`-` reads it from stdin).
    #[arg(long)]
    tree: PathBuf,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Turns on the available ES6 transforms.
    #[arg(long)]
    es6: bool,

    /// Turns on the utility transforms (trailing-comma stripping).
    #[arg(long)]
    utility: bool,

    /// Target ECMAScript version. "es3" avoids reserved words as property
    /// names; use it when IE8-era engines must parse the output.
    #[arg(long, value_enum, default_value_t = TargetArg::Es5)]
    target: TargetArg,

    /// Parse the file as an ES6 module (implicit strict mode).
    #[arg(long)]
    es6module: bool,

    /// Parse the file as an ES6 module without implicit strict mode.
    #[arg(long)]
    non_strict_es6module: bool,

    /// Embed an inline source map in the transformed source.
    #[arg(long)]
    source_map_inline: bool,

    /// Escape non-ASCII characters in the output.
    #[arg(long)]
    ascii_only: bool,

    /// Extra feature toggles (repeatable), e.g. `spread-runtime`.
    #[arg(long = "feature", value_name = "NAME")]
    features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    Es3,
    Es5,
}

impl From<TargetArg> for Target {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Es3 => Target::Es3,
            TargetArg::Es5 => Target::Es5,
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&cli, &err);
            ExitCode::from(err.error_code().code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), DlvError> {
    let source_path = cli.source.display().to_string();
    let source = std::fs::read_to_string(&cli.source)
        .map_err(|io_err| DlvError::io(&source_path, io_err))?;
    let tree_json = read_tree(cli)?;
    let tree: Node = serde_json::from_str(&tree_json)?;

    let options = Options {
        es6: cli.es6,
        utility: cli.utility,
        target: cli.target.into(),
        es6_module: cli.es6module,
        non_strict_es6_module: cli.non_strict_es6module,
        source_map_inline: cli.source_map_inline,
        ascii_only: cli.ascii_only,
        source_filename: Some(source_path.clone()),
        features: cli.features.iter().cloned().collect(),
    };
    let result = transform(&tree, &source, &options)?;
    debug!(
        source = %source_path,
        input_len = source.len(),
        output_len = result.code.len(),
        "transform complete"
    );

    let mut rendered = result.code;
    if let Some(comment) = result.inline_source_map_comment {
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        rendered.push_str(&comment);
        rendered.push('\n');
    }

    match &cli.output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|io_err| DlvError::io(path.display().to_string(), io_err))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn read_tree(cli: &Cli) -> Result<String, DlvError> {
    if cli.tree.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|io_err| DlvError::io("<stdin>", io_err))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(&cli.tree)
            .map_err(|io_err| DlvError::io(cli.tree.display().to_string(), io_err))
    }
}

/// Print the failure, with the offending construct's line:column when the
/// error carries a source range.
fn report(cli: &Cli, err: &DlvError) {
    if let DlvError::Transform(transform_err) = err {
        if let Some(span) = transform_err.span() {
            if let Ok(source) = std::fs::read_to_string(&cli.source) {
                let (line, col) = byte_offset_to_position(&source, span.start);
                eprintln!("dlv: {}:{line}:{col}: {err}", cli.source.display());
                return;
            }
        }
    }
    eprintln!("dlv: {err}");
}
