//! `leandoc` — the CLI boundary. Reads a file, runs it through the
//! library's parse/generate pipeline, and writes the result. All file I/O
//! and argument handling lives here; the library crate never touches a
//! filesystem.
//!
//! Exit codes: 0 success, 1 parse/generator error (message on stderr), 2
//! usage/I/O error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use leandoc::ast::dump;
use leandoc::{generate, parse_document, GenOptions};

#[derive(Parser, Debug)]
#[command(
    name = "leandoc",
    version,
    about = "Translates LeanDoc into Typst source"
)]
struct Cli {
    /// Dump the document tree for INPUT instead of generating Typst.
    #[arg(long, value_name = "INPUT", conflicts_with = "typst")]
    ast: Option<PathBuf>,

    /// Dump format for --ast: "tree" (default, box-drawing) or "json".
    #[arg(long, default_value = "tree")]
    format: String,

    /// Translate INPUT to Typst source.
    #[arg(long, value_name = "INPUT")]
    typst: Option<PathBuf>,

    /// Output file for --typst.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Built-in template to use: "plain" or "report".
    #[arg(long, default_value = "plain")]
    template: String,

    /// Path to a custom Typst template file (`#import` instead of a
    /// built-in preamble).
    #[arg(long, value_name = "FILE")]
    template_file: Option<String>,

    /// Disable raw passthrough content (stem blocks, passthrough fences).
    #[arg(long)]
    no_raw: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.ast {
        return run_ast(path, &cli.format);
    }
    if let Some(path) = &cli.typst {
        return run_typst(path, &cli);
    }

    eprintln!("usage: leandoc --ast <INPUT> | --typst <INPUT> -o <OUTPUT> [options]");
    ExitCode::from(2)
}

fn run_ast(path: &PathBuf, format: &str) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", path.display());
            return ExitCode::from(2);
        }
    };

    let tree = match parse_document(&text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    match format {
        "json" => match dump::render_json(&tree) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: cannot serialize tree: {e}");
                return ExitCode::from(1);
            }
        },
        "tree" => print!("{}", dump::render_tree(&tree)),
        other => {
            eprintln!("error: unknown --format '{other}' (expected 'tree' or 'json')");
            return ExitCode::from(2);
        }
    }
    ExitCode::SUCCESS
}

fn run_typst(path: &PathBuf, cli: &Cli) -> ExitCode {
    let Some(output) = &cli.output else {
        eprintln!("error: --typst requires -o/--output");
        return ExitCode::from(2);
    };

    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", path.display());
            return ExitCode::from(2);
        }
    };

    let tree = match parse_document(&text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    let opts = GenOptions {
        template_name: cli.template.clone(),
        template_file: cli.template_file.clone(),
        allow_raw_passthrough: !cli.no_raw,
        ..GenOptions::default()
    };

    let typst = match generate(&tree, &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = fs::write(output, typst) {
        eprintln!("error: cannot write '{}': {e}", output.display());
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
