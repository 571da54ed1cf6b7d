//! Cross-page bulk selection CLI.
//!
//! Fetches pages from the configured collection API and shows how a bulk
//! "select first N" intent completes as pages are loaded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pageselect::exit_codes;
use pageselect::io::config::{DEFAULT_CONFIG_PATH, SelectorConfig, load_config, write_config};
use pageselect::io::fetch::{FetchRequest, HttpPageSource, PageSource};
use pageselect::load::page_through;
use pageselect::logging;
use pageselect::session::{SelectionSession, selection_summary};
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(
    name = "pageselect",
    version,
    about = "Cross-page bulk selection over a paginated record list"
)]
struct Cli {
    /// Path to the selector config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Fetch one page (zero-based) and print one tab-separated line per record.
    Fetch {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Submit a bulk count, then load pages 0..=through-page and print the selection.
    Bulk {
        /// Number of leading records to select. Invalid input clears the intent.
        #[arg(long, allow_hyphen_values = true)]
        count: String,
        /// Last zero-based page to load.
        #[arg(long, default_value_t = 0)]
        through_page: u32,
    },
}

#[tokio::main]
async fn main() {
    logging::init();
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Fetch { page } => cmd_fetch(&cli.config, page).await,
        Command::Bulk {
            count,
            through_page,
        } => cmd_bulk(&cli.config, &count, through_page).await,
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        return Ok(exit_codes::OK);
    }
    write_config(path, &SelectorConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(exit_codes::OK)
}

async fn cmd_fetch(path: &Path, page: u32) -> Result<i32> {
    let cfg = load_config(path)?;
    let source = HttpPageSource::new(&cfg.api)?;
    let request = FetchRequest {
        page: page + 1,
        limit: cfg.page_size,
    };
    let response = match source.fetch_page(request).await {
        Ok(response) => response,
        Err(err) => {
            eprintln!("{:#}", err);
            return Ok(exit_codes::FETCH_FAILED);
        }
    };
    for record in &response.records {
        let (start, end) = record.display_dates();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.id,
            record.display_title(),
            record.display_origin(),
            record.display_artist(),
            record.display_inscriptions(),
            start,
            end
        );
    }
    Ok(exit_codes::OK)
}

async fn cmd_bulk(path: &Path, count: &str, through_page: u32) -> Result<i32> {
    let cfg = load_config(path)?;
    let source = HttpPageSource::new(&cfg.api)?;
    let session = Mutex::new(SelectionSession::new(cfg.page_size));
    session.lock().await.submit_bulk_input(count);

    if let Err(err) = page_through(&session, &source, through_page).await {
        eprintln!("{:#}", err);
        return Ok(exit_codes::FETCH_FAILED);
    }

    let guard = session.lock().await;
    let selected = guard.reconciler().selected();
    for id in selected.iter() {
        println!("{}", id);
    }
    if let Some(summary) = selection_summary(selected.len()) {
        println!("{}", summary);
    }
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bulk_with_defaults() {
        let cli = Cli::parse_from(["pageselect", "bulk", "--count", "20"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(matches!(
            cli.command,
            Command::Bulk { ref count, through_page: 0 } if count == "20"
        ));
    }

    #[test]
    fn parse_bulk_accepts_negative_input() {
        let cli = Cli::parse_from(["pageselect", "bulk", "--count", "-4", "--through-page", "2"]);
        assert!(matches!(
            cli.command,
            Command::Bulk { ref count, through_page: 2 } if count == "-4"
        ));
    }

    #[test]
    fn parse_init_force_with_config() {
        let cli = Cli::parse_from(["pageselect", "init", "--force", "--config", "x.toml"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn init_keeps_existing_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "page_size = 5\n").expect("write");

        cmd_init(&path, false).expect("init");
        assert_eq!(load_config(&path).expect("load").page_size, 5);

        cmd_init(&path, true).expect("init force");
        assert_eq!(load_config(&path).expect("load").page_size, 12);
    }
}
