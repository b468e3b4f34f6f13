//! Web Crawl
//!
//! Same-origin breadth-first crawl producing per-page Markdown:
//! - URL normalization and origin scope
//! - HTTP fetch behind the [`PageFetcher`] seam
//! - Noise stripping, content region selection and Markdown conversion

pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod markdown;
pub mod url_scope;

pub use crawler::{CrawlReport, WebCrawler};
pub use extract::{ExtractedPage, extract_page};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use markdown::element_to_markdown;
pub use url_scope::{ScopeGuard, is_content_scheme, normalize, normalize_seed};
