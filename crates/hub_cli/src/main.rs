//! Command-line host for the Intelligence Hub core.
//!
//! # Responsibility
//! - Stand in for the dashboard UI: seed, import, list and show tables.
//! - Print JSON envelopes on stdout; exit non-zero on failure.
//!
//! The registry lives for one process, so `--seed` and the command run
//! against the same in-memory tables.

use clap::{Parser, Subcommand};
use hub_core::api::{import_csv, seed_demo_data};
use hub_core::{default_log_level, init_logging, HubService, TableRegistry};
use log::warn;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "hub_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Populate demo tables before running the command
    #[arg(long, global = true)]
    seed: bool,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "HUB_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "HUB_LOG_DIR", global = true)]
    log_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered tables in registration order
    List,

    /// Print one table as JSON records
    Show {
        /// Table name
        table: String,
    },

    /// Replace a table with the contents of a CSV file
    Import {
        /// Target table name
        table: String,

        /// CSV file to read
        file: PathBuf,

        /// Encoding label of the file
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let service = HubService::new(TableRegistry::new());
    if cli.seed {
        let seeded = seed_demo_data(&service);
        if !seeded.ok {
            print_json(&seeded);
            return ExitCode::FAILURE;
        }
    }

    match cli.command {
        Command::List => {
            print_json(&service.list_tables());
            ExitCode::SUCCESS
        }
        Command::Show { table } => match service.get_table(&table) {
            Ok(found) => {
                print_json(&*found);
                ExitCode::SUCCESS
            }
            Err(err) => {
                print_json(&json!({ "ok": false, "kind": "NotFound", "detail": err.to_string() }));
                ExitCode::FAILURE
            }
        },
        Command::Import {
            table,
            file,
            encoding,
        } => {
            let content = match std::fs::read(&file) {
                Ok(content) => content,
                Err(err) => {
                    warn!(
                        "event=cli_read module=cli status=error path={} error={}",
                        file.display(),
                        err
                    );
                    eprintln!("failed to read `{}`: {err}", file.display());
                    return ExitCode::FAILURE;
                }
            };
            let result = import_csv(&service, &table, &content, Some(encoding.as_str()));
            print_json(&result);
            if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render output: {err}"),
    }
}
