//! # docstore Shell Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Open or create a database file
//! docstore ./docs.db
//!
//! # Refuse every write
//! docstore --read-only ./docs.db
//!
//! # In-memory scratch database
//! docstore
//!
//! # Verbose logging
//! DOCSTORE_LOG=debug docstore ./docs.db
//! ```

use docstore::cli::Repl;
use docstore::config::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use docstore::Database;
use eyre::{bail, Result, WrapErr};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut read_only = false;
    let mut db_path: Option<PathBuf> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("docstore {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--read-only" | "-r" => {
                read_only = true;
            }
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {}", arg);
            }
            path => {
                if db_path.is_some() {
                    bail!("Multiple database paths specified");
                }
                db_path = Some(PathBuf::from(path));
            }
        }
    }

    init_logging();

    let builder = Database::builder().read_only(read_only);
    let db = match &db_path {
        Some(path) => builder
            .path(path)
            .open()
            .wrap_err_with(|| format!("failed to open database at {:?}", path))?,
        None => builder
            .in_memory()
            .open()
            .wrap_err("failed to open in-memory database")?,
    };

    let mut repl = Repl::new(db)?;
    repl.run()?;

    Ok(())
}

fn init_logging() {
    let filter = env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("docstore - schema-flexible document store on SQLite");
    println!();
    println!("USAGE:");
    println!("    docstore [OPTIONS] [DATABASE_PATH]");
    println!();
    println!("ARGS:");
    println!("    [DATABASE_PATH]    SQLite file to open or create (in-memory if omitted)");
    println!();
    println!("OPTIONS:");
    println!("    -r, --read-only    Reject every write to the opened stores");
    println!("    -h, --help         Print help information");
    println!("    -v, --version      Print version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}       Log filter (default: {})", LOG_ENV_VAR, DEFAULT_LOG_FILTER);
    println!("    DOCSTORE_HISTORY   History file (empty disables history)");
}
