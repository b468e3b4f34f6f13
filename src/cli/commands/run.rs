//! Run Command
//!
//! Truncates the output file, digests the selected source and writes the
//! resulting document.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregate::{render_directory, render_web};
use crate::cli::ui::Output;
use crate::config::{Config, WalkConfig};
use crate::repo::{GitCloner, RepoMaterializer, RepositoryCloner};
use crate::types::Result;
use crate::walker::DirectoryWalker;
use crate::web::{HttpFetcher, PageFetcher, WebCrawler};

/// The one content source a run digests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Web { url: String },
    Repo { url: String },
    Directory { path: PathBuf },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web { url } => write!(f, "web {}", url),
            Self::Repo { url } => write!(f, "repository {}", url),
            Self::Directory { path } => write!(f, "directory {}", path.display()),
        }
    }
}

/// Document text and counters produced by one source
#[derive(Debug, Default)]
pub struct Digest {
    pub document: String,
    /// Pages captured or files listed
    pub items: usize,
    /// Unique URLs visited (web only)
    pub visited: Option<usize>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub source: Source,
    pub output_path: PathBuf,
    pub bytes_written: usize,
    pub items: usize,
    pub visited: Option<usize>,
}

pub async fn run(source: &Source, config: &Config) -> Result<RunSummary> {
    let output_path = &config.output.file;
    truncate_output(output_path).await;

    let digest = match source {
        Source::Web { url } => {
            let crawler = WebCrawler::new(HttpFetcher::new(&config.crawl)?, &config.crawl);
            crawl_site(&crawler, url).await?
        }
        Source::Repo { url } => {
            let materializer = RepoMaterializer::new(GitCloner::new(&config.repo), &config.repo);
            digest_repo(&materializer, url, &config.walk).await?
        }
        Source::Directory { path } => digest_directory(path, &config.walk).await?,
    };

    let bytes_written = write_output(output_path, &digest.document).await?;

    Ok(RunSummary {
        source: source.clone(),
        output_path: output_path.clone(),
        bytes_written,
        items: digest.items,
        visited: digest.visited,
    })
}

pub async fn crawl_site<F: PageFetcher>(crawler: &WebCrawler<F>, url: &str) -> Result<Digest> {
    let report = crawler.crawl(url).await?;
    Ok(Digest {
        document: render_web(&report.fragments),
        items: report.fragments.len(),
        visited: Some(report.visited),
    })
}

pub async fn digest_repo<C: RepositoryCloner>(
    materializer: &RepoMaterializer<C>,
    url: &str,
    walk: &WalkConfig,
) -> Result<Digest> {
    let repo = materializer.materialize(url, walk).await?;
    let items = repo.output.files.len();
    Ok(Digest {
        document: render_directory(&repo.name, repo.output),
        items,
        visited: None,
    })
}

pub async fn digest_directory(path: &Path, walk: &WalkConfig) -> Result<Digest> {
    let walker = DirectoryWalker::new(path, walk).await?;
    let output = walker.walk().await;
    let items = output.files.len();
    Ok(Digest {
        document: render_directory(&walker.root_name(), output),
        items,
        visited: None,
    })
}

/// Empty the output file so a failed run never leaves stale content
async fn truncate_output(path: &Path) {
    if let Err(e) = tokio::fs::write(path, "").await {
        warn!("Could not initialize output file {}: {}", path.display(), e);
    }
}

/// Write the trimmed document; returns the number of bytes written
async fn write_output(path: &Path, document: &str) -> Result<usize> {
    let document = document.trim();
    if document.is_empty() {
        info!("No content was produced; {} left empty", path.display());
        return Ok(0);
    }

    tokio::fs::write(path, document).await?;
    info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(document.len())
}

pub fn print_summary(summary: &RunSummary, output: &Output) {
    output.section("Summary");
    output.field("Source", &summary.source);
    match summary.visited {
        Some(visited) => {
            output.field("Pages", summary.items);
            output.field("Visited URLs", visited);
        }
        None => output.field("Files", summary.items),
    }
    output.field("Output", summary.output_path.display());

    if summary.bytes_written > 0 {
        output.success(&format!(
            "Wrote {} bytes to {}",
            summary.bytes_written,
            summary.output_path.display()
        ));
    } else {
        output.warning("No content produced; output file is empty");
    }
}
