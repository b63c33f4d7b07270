//! cembed - embed binary files as C source
//!
//! Two subcommands cover the two halves of the pipeline: `cembed spec` scans
//! directories and produces a spec document, `cembed source` consumes a spec
//! document and emits the generated C source. The two halves may run in
//! different processes or environments; the spec document is the only thing
//! that travels between them.

use anyhow::{bail, Context, Result};
use cembed_core::{SourceGenerator, Spec, SpecBuilder};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Embed binary files as C source with a lookup-by-id API
#[derive(Parser, Debug)]
#[command(name = "cembed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan directories and produce a spec document
    Spec(SpecArgs),
    /// Generate the embedding C source from a spec document
    Source(SourceArgs),
}

#[derive(Args, Debug)]
struct SpecArgs {
    /// Directories to scan for files to embed
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Base directory for relative path computation
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Output spec document path ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// API prefix inserted into the generated lookup function's name
    #[arg(short, long, default_value = "default")]
    prefix: String,

    /// Include guard recorded in the spec document
    #[arg(short, long, default_value = "CEMBED_H_INCLUDED")]
    guard: String,

    /// Indent width of the emitted spec document
    #[arg(short, long, default_value = "2")]
    indent: usize,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Spec document path ('-' for stdin)
    spec: String,

    /// Base directory for resolving each input file's path
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Output source file path ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Spec(args) => run_spec(&args),
        Command::Source(args) => run_source(&args),
    }
}

/// Checked manually rather than marked required in clap so that omitting it
/// exits with code 1 like every other fatal condition
fn require_base(base: &Option<PathBuf>) -> Result<&PathBuf> {
    match base {
        Some(base) => Ok(base),
        None => bail!("--base option is required"),
    }
}

/// Build a spec from the given roots and write the document
fn run_spec(args: &SpecArgs) -> Result<()> {
    let base = require_base(&args.base)?;

    let spec = SpecBuilder::new(base)
        .roots(args.roots.iter().cloned())
        .api_prefix(&args.prefix)
        .include_guard(&args.guard)
        .build()?;

    info!("collected {} input files", spec.input_files.len());

    let document = spec.to_json_pretty(args.indent)?;
    write_output(&args.output, document.as_bytes())
}

/// Load a spec document and emit the generated C source
fn run_source(args: &SourceArgs) -> Result<()> {
    let base = require_base(&args.base)?;

    let spec = if args.spec == "-" {
        debug!("reading spec from stdin");
        let mut document = String::new();
        io::stdin()
            .read_to_string(&mut document)
            .context("failed to read spec from stdin")?;
        Spec::from_json(&document)?
    } else {
        let document = fs::read_to_string(&args.spec)
            .with_context(|| format!("failed to open spec file: {}", args.spec))?;
        Spec::from_json(&document)?
    };

    info!("generating source for {} input files", spec.input_files.len());

    let generator = SourceGenerator::new(spec, base);
    if args.output == "-" {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        generator.generate(&mut out)?;
        out.flush()?;
    } else {
        let file = fs::File::create(&args.output)
            .with_context(|| format!("failed to open output source file: {}", args.output))?;
        let mut out = BufWriter::new(file);
        generator.generate(&mut out)?;
        out.flush()
            .with_context(|| format!("failed to write output source file: {}", args.output))?;
    }

    Ok(())
}

/// Write bytes to a file path or stdout for '-'
fn write_output(dest: &str, bytes: &[u8]) -> Result<()> {
    if dest == "-" {
        io::stdout()
            .write_all(bytes)
            .context("failed to write to stdout")?;
    } else {
        fs::write(dest, bytes).with_context(|| format!("failed to open output file: {}", dest))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec_args(roots: Vec<PathBuf>, base: Option<PathBuf>, output: &str) -> SpecArgs {
        SpecArgs {
            roots,
            base,
            output: output.to_string(),
            prefix: "default".to_string(),
            guard: "CEMBED_H_INCLUDED".to_string(),
            indent: 2,
        }
    }

    #[test]
    fn test_spec_then_source_pipeline() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        fs::write(assets.join("a.bin"), [0x01u8, 0x02, 0x03]).unwrap();
        fs::write(assets.join("b.bin"), []).unwrap();

        let spec_path = dir.path().join("embed.json");
        run_spec(&spec_args(
            vec![assets.clone()],
            Some(assets.clone()),
            spec_path.to_str().unwrap(),
        ))
        .unwrap();

        let source_path = dir.path().join("embed.c");
        run_source(&SourceArgs {
            spec: spec_path.to_str().unwrap().to_string(),
            base: Some(assets),
            output: source_path.to_str().unwrap().to_string(),
        })
        .unwrap();

        let source = fs::read_to_string(source_path).unwrap();
        assert!(source.contains("static uint8_t file_data_0[] = {"));
        assert!(source.contains("    0x01,0x02,0x03,0x00"));
        assert!(source.contains("{ \"a.bin\", file_data_0, 3 },"));
        assert!(source.contains("{ \"b.bin\", file_data_1, 0 },"));
        assert!(source.contains("int cembed_default_find("));
    }

    #[test]
    fn test_spec_requires_base() {
        let dir = TempDir::new().unwrap();
        let result = run_spec(&spec_args(vec![dir.path().to_path_buf()], None, "-"));
        assert!(result.is_err());
    }

    #[test]
    fn test_spec_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let result = run_spec(&spec_args(
            vec![dir.path().join("missing")],
            Some(dir.path().to_path_buf()),
            "-",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
