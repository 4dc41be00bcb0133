//! dezip - command-line zip extraction with zip-slip protection.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use dezip_core::{ExtractOptions, NameEncoding};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Extract a zip archive into a directory, refusing entries that try to
/// escape it.
#[derive(Parser)]
#[command(name = "dezip")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Archive file to extract
    archive: PathBuf,

    /// Output directory (default: current directory)
    output_dir: Option<PathBuf>,

    /// Mode for directories whose entries carry no permission info
    #[arg(long, value_name = "OCTAL", value_parser = parse_octal_mode)]
    dir_mode: Option<u32>,

    /// Mode for files whose entries carry no permission info
    #[arg(long, value_name = "OCTAL", value_parser = parse_octal_mode)]
    file_mode: Option<u32>,

    /// Encoding for archive-internal entry names
    #[arg(long, value_enum, default_value_t = EncodingArg::Auto)]
    encoding: EncodingArg,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum EncodingArg {
    /// Honor the entry's UTF-8 flag, falling back to CP437
    Auto,
    /// Force UTF-8
    Utf8,
    /// Force IBM codepage 437
    Cp437,
}

impl From<EncodingArg> for NameEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Auto => Self::Auto,
            EncodingArg::Utf8 => Self::Utf8,
            EncodingArg::Cp437 => Self::Cp437,
        }
    }
}

fn parse_octal_mode(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8)
        .map_err(|_| format!("invalid octal mode: {s}"))
        .and_then(|mode| {
            if mode > 0o777 {
                Err(format!("mode out of range: {s}"))
            } else {
                Ok(mode)
            }
        })
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    // Relative output paths are resolved here; the library itself only
    // accepts absolute targets.
    let target_dir = match cli.output_dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };

    let mut opts = ExtractOptions::new(&target_dir).name_encoding(cli.encoding.into());
    if let Some(mode) = cli.dir_mode {
        opts = opts.default_dir_mode(mode);
    }
    if let Some(mode) = cli.file_mode {
        opts = opts.default_file_mode(mode);
    }

    dezip_core::extract(&cli.archive, opts)
        .with_context(|| format!("failed to extract {}", cli.archive.display()))?;

    info!("extracted {} to {}", cli.archive.display(), target_dir.display());
    Ok(())
}
