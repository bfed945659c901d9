//! phpgen — generate PHP class files from declarative XML definitions.
//!
//! Reads XML documents describing classes (properties, methods, docblocks,
//! macros) and writes one formatted `.php` file per class: docblocks wrapped
//! at 80 columns, getters/setters generated from property declarations, and
//! `{{macro}}` calls expanded in all free text.

mod macros;
mod model;
mod namespace;
mod parser;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "phpgen",
    about = "Generate PHP class files from declarative XML definitions"
)]
struct Cli {
    /// Input XML files (glob patterns supported)
    files: Vec<String>,

    /// Default output directory, overriding the document's default-output
    /// attribute
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        bail!("missing input xml file");
    }

    let inputs = expand_globs(&cli.files)?;
    if inputs.is_empty() {
        bail!("no input files matched");
    }

    for path in &inputs {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = parser::parse_document(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        generate(&document, cli.output.as_deref())?;
    }

    println!("Done.");
    Ok(())
}

/// Generate every class of one document. Any failure aborts the whole run —
/// there is no per-class recovery.
fn generate(document: &model::Document, output_override: Option<&Path>) -> Result<()> {
    let mut registry = macros::MacroRegistry::new();
    for (name, template) in &document.macros {
        registry.register(name, template);
    }

    for class in &document.classes {
        let directory = output_directory(class, document, output_override)?;
        println!("Writing {} to file.", class.name);
        render::class::render_class(class, &directory, &registry)?;
    }

    Ok(())
}

/// Per-class `output` attribute wins, then the CLI override, then the
/// document's `default-output`.
fn output_directory(
    class: &model::ClassSpec,
    document: &model::Document,
    output_override: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(output) = &class.output {
        return Ok(PathBuf::from(output));
    }
    if let Some(directory) = output_override {
        return Ok(directory.to_path_buf());
    }
    match &document.default_output {
        Some(directory) => Ok(PathBuf::from(directory)),
        None => bail!(
            "default output directory is not set, but class {} has no hardcoded output directory",
            class.name
        ),
    }
}

/// Expand glob patterns into a sorted, deduplicated list of files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }

    files.sort();
    files.dedup();
    Ok(files)
}
