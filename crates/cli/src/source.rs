// ABOUTME: Resolves the CLI's list source (one URL, a file of URLs, or the demo list).
// ABOUTME: Also decides the export file name for each kind of source.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use shelfminer_scrape::ListReference;

/// List scraped by `--test`.
pub const DEMO_LIST_URL: &str =
    "https://www.goodreads.com/list/show/195641.Books_to_read_on_Kashmir";

/// Where the list URLs of one run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    List(ListReference),
    File { path: PathBuf, urls: Vec<String> },
}

impl Source {
    pub fn list(url: &str) -> Result<Self> {
        Ok(Source::List(ListReference::parse(url)?))
    }

    /// Reads one list URL per line, ignoring blank lines.
    pub fn file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read list file {}", path.display()))?;
        let urls = parse_url_lines(&text)
            .iter()
            .map(|line| ListReference::parse(line).map(|list| list.url))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("list file {}", path.display()))?;
        if urls.is_empty() {
            bail!("list file {} contains no URLs", path.display());
        }
        Ok(Source::File {
            path: path.to_path_buf(),
            urls,
        })
    }

    /// URLs of every list to expand, in order.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            Source::List(list) => vec![list.url.as_str()],
            Source::File { urls, .. } => urls.iter().map(String::as_str).collect(),
        }
    }

    /// `<id> - <name>.csv` for a single list, `<file stem>.csv` for a file.
    pub fn output_file_name(&self) -> String {
        match self {
            Source::List(list) => format!("{}.csv", list.display_name()),
            Source::File { path, .. } => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "books".to_string());
                format!("{stem}.csv")
            }
        }
    }
}

fn parse_url_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
