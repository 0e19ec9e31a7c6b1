//! PHTML interpreter CLI
//!
//! Takes the syntax tree produced by the PHTML parser, serialized as JSON.

use clap::{Parser, Subcommand};
use phtml::interp::config::DEFAULT_MAX_CALL_DEPTH;
use phtml::interp::loader;
use phtml::{Config, Node, ReturnMode, RuntimeError};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "phtml", version, about = "PHTML interpreter")]
struct Cli {
    /// Log interpreter activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the program's main function
    Run {
        /// Syntax tree file (JSON)
        file: PathBuf,
        /// Maximum function call depth
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,
        /// Keep executing after `return`; the last returned value wins
        #[arg(long)]
        legacy_return: bool,
    },
    /// Print the syntax tree and the loaded function signatures (debug)
    Dump {
        /// Syntax tree file (JSON)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Run {
            file,
            max_depth,
            legacy_return,
        } => {
            let mode = if legacy_return {
                ReturnMode::Deferred
            } else {
                ReturnMode::EarlyExit
            };
            let config = Config::default()
                .with_max_call_depth(max_depth)
                .with_return_mode(mode);
            run_file(&file, config)
        }
        Command::Dump { file } => dump_file(&file),
    };

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<RuntimeError>() {
            if !err.is_fatal() {
                eprintln!("warning: {err}");
                return;
            }
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn read_tree(path: &Path) -> Result<Node, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let tree = serde_json::from_str(&source)?;
    Ok(tree)
}

fn run_file(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let tree = read_tree(path)?;
    tracing::info!(file = %path.display(), "running program");
    let out = BufWriter::new(io::stdout().lock());
    phtml::run_program(&tree, out, config)?;
    Ok(())
}

fn dump_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tree = read_tree(path)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);

    let catalog = loader::load(&tree)?;
    for function in catalog.iter() {
        println!("fn {function}");
    }
    Ok(())
}
