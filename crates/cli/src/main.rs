// ABOUTME: CLI for exporting book lists to an import-ready CSV file.
// ABOUTME: Scrapes one list URL, a file of list URLs, or the demo list, then writes one CSV per run.

mod logging;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{ArgGroup, Parser};
use shelfminer_scrape::{save_records, Scraper, DEFAULT_BASE_URL, DEFAULT_SHELF};

use crate::source::{Source, DEMO_LIST_URL};

/// Scrape book lists into a CSV ready for library import tools.
#[derive(Parser, Debug)]
#[command(name = "shelfminer", version)]
#[command(about = "Scrape book lists into an import-ready CSV", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file", "test"])))]
struct Args {
    /// List URL to scrape.
    #[arg(long)]
    url: Option<String>,

    /// File with one list URL per line.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Scrape the built-in demo list.
    #[arg(long)]
    test: bool,

    /// Shelf label written to the Bookshelves and Exclusive Shelf columns.
    #[arg(long, visible_alias = "bookshelf", default_value = DEFAULT_SHELF)]
    shelf: String,

    /// Directory the CSV file is written to (created if missing).
    #[arg(long, visible_alias = "output_dir", default_value = ".")]
    out_dir: PathBuf,

    /// Site origin book paths are resolved against.
    #[arg(long, hide = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> Result<()> {
    logging::init().context("init logging")?;
    tracing::debug!(?args, "parsed cli");

    let source = match (&args.url, &args.file) {
        (Some(url), _) => Source::list(url)?,
        (None, Some(path)) => Source::file(path)?,
        (None, None) => Source::list(DEMO_LIST_URL)?,
    };

    let scraper = Scraper::builder()
        .base_url(&args.base_url)
        .build()
        .context("build HTTP client")?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let records = scraper
        .scrape_lists(&source.urls(), &today, &args.shelf)
        .context("scrape lists")?;

    let path = args.out_dir.join(source.output_file_name());
    save_records(&records, &path).with_context(|| format!("write {}", path.display()))?;
    println!("{}", path.display());

    Ok(())
}
