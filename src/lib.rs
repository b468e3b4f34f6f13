//! crawldigest - Source Content Digester
//!
//! Collects content from a website, a remote repository, or a local
//! directory into a single Markdown document.
//!
//! ## Sources
//!
//! - **Web**: same-origin breadth-first crawl, depth bounded, one Markdown
//!   fragment per HTML page
//! - **Repository**: shallow clone into a scratch directory, walked like a
//!   local directory and removed afterward
//! - **Directory**: recursive walk honoring `.gitignore`, with a tree view
//!   followed by every file's content in a fenced block
//!
//! ## Quick Start
//!
//! ```ignore
//! use crawldigest::{Config, DirectoryWalker, render_directory};
//!
//! let config = Config::default();
//! let walker = DirectoryWalker::new("./project", &config.walk).await?;
//! let output = walker.walk().await;
//! let document = render_directory(&walker.root_name(), output);
//! ```
//!
//! ## Modules
//!
//! - [`web`]: URL scope, fetching, extraction and the crawler
//! - [`walker`]: ignore rules, content policy and the directory walk
//! - [`repo`]: clone process and scratch directory lifecycle
//! - [`aggregate`]: final document rendering
//! - [`config`]: layered configuration

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod repo;
pub mod types;
pub mod walker;
pub mod web;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ConfigOverrides};

// Error Types
pub use types::error::{DigestError, Result};

// Domain Types
pub use types::{FileContent, FileDescriptor, FrontierEntry, PageFragment};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use aggregate::{render_directory, render_web};
pub use repo::{GitCloner, RepoMaterializer, RepositoryCloner};
pub use walker::{DirectoryWalker, WalkOutput};
pub use web::{CrawlReport, HttpFetcher, PageFetcher, WebCrawler};
