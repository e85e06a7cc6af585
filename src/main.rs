//! plugsum: keep a plugin directory and its PLUGIN_SUMMARY.html in sync.
//!
//! A plugin is a folder holding a same-named source file (`ping/ping.ts`).
//! The summary document lists every plugin twice: as a link in the
//! `toc-list` block and as a heading/paragraph/separator fragment in the
//! article body. An interactive menu adds missing plugins, edits or deletes
//! fragments, and keeps the `共 N 个` count current.

mod codec;
mod config;
mod document;
mod error;
mod model;
mod repl;
mod repo;
mod store;
mod toc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "plugsum",
    version,
    about = "Synchronize a plugin directory with its HTML summary document"
)]
struct Cli {
    /// Plugin directory. Prompted for when omitted.
    directory: Option<PathBuf>,

    /// Summary document file name inside the plugin directory
    #[arg(long, default_value = config::DEFAULT_DOCUMENT)]
    document: String,

    /// Extension of the same-named source file that marks a plugin folder
    #[arg(long, default_value = config::DEFAULT_SOURCE_EXT)]
    ext: String,

    /// Log more to stderr (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let directory = match cli.directory {
        Some(dir) => dir,
        None => prompt_directory(&mut input)?,
    };

    let config = config::Config::new(&directory, &cli.document, &cli.ext)
        .with_context(|| format!("cannot use plugin directory {}", directory.display()))?;

    let console = repl::Console::new(input, io::stdout());
    repl::Controller::new(config, console)
        .run()
        .context("plugin summary session failed")?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn prompt_directory(input: &mut impl BufRead) -> Result<PathBuf> {
    print!("Plugin directory: ");
    io::stdout().flush().context("failed to write prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read plugin directory")?;
    let line = line.trim();
    if line.is_empty() {
        bail!("no plugin directory given");
    }
    Ok(PathBuf::from(line))
}
