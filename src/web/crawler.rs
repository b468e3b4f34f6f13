//! Breadth-first web crawler
//!
//! ## Frontier
//!
//! A FIFO queue of [`FrontierEntry`] values plus a visited set, both owned by
//! a single [`WebCrawler::crawl`] call. A URL is marked visited when it is
//! enqueued, so it is fetched at most once per crawl.
//!
//! ## Failures
//!
//! An invalid seed aborts the crawl. Fetch errors, timeouts and non-HTML
//! responses only skip the affected page.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::types::{FrontierEntry, PageFragment, Result};

use super::extract::extract_page;
use super::fetch::PageFetcher;
use super::url_scope::{ScopeGuard, normalize, normalize_seed};

/// Outcome of one crawl
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Non-empty page fragments in completion order
    pub fragments: Vec<PageFragment>,
    /// Unique URLs marked visited, including failed ones
    pub visited: usize,
    pub failed: usize,
    pub skipped_non_html: usize,
}

pub struct WebCrawler<F: PageFetcher> {
    fetcher: F,
    max_depth: u32,
    delay: Duration,
}

impl<F: PageFetcher> WebCrawler<F> {
    pub fn new(fetcher: F, config: &CrawlConfig) -> Self {
        Self {
            fetcher,
            max_depth: config.max_depth,
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Crawl from `seed` until the frontier is empty
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport> {
        let seed = normalize_seed(seed)?;
        let scope = ScopeGuard::new(&seed);

        info!(
            "Starting crawl at {} (max depth {}, scope {})",
            seed,
            self.max_depth,
            scope.origin()
        );

        let mut frontier = VecDeque::from([FrontierEntry::new(seed.clone(), 0)]);
        let mut visited: HashSet<Url> = HashSet::from([seed]);
        let mut report = CrawlReport::default();
        let mut first_fetch = true;

        while let Some(entry) = frontier.pop_front() {
            if !first_fetch && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            first_fetch = false;

            info!("Crawling (depth {}): {}", entry.depth, entry.url);

            let page = match self.fetcher.fetch(&entry.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", entry.url, e);
                    report.failed += 1;
                    continue;
                }
            };

            if !page.is_html() {
                debug!(
                    "Skipping non-HTML content at {} ({})",
                    entry.url,
                    page.content_type.as_deref().unwrap_or("no content type")
                );
                report.skipped_non_html += 1;
                continue;
            }

            let extracted = extract_page(&page.body);

            if extracted.markdown.is_empty() {
                debug!("No content extracted from {}", entry.url);
            } else {
                report.fragments.push(PageFragment {
                    url: entry.url.clone(),
                    depth: entry.depth,
                    markdown: extracted.markdown,
                });
            }

            if entry.depth >= self.max_depth {
                continue;
            }

            let mut discovered = 0usize;
            for href in &extracted.links {
                let Some(url) = normalize(href, &entry.url) else {
                    continue;
                };
                if !scope.admits(&url) {
                    continue;
                }
                if visited.insert(url.clone()) {
                    frontier.push_back(FrontierEntry::new(url, entry.depth + 1));
                    discovered += 1;
                }
            }
            debug!("Discovered {} new links on {}", discovered, entry.url);
        }

        report.visited = visited.len();
        info!(
            "Crawl finished: {} unique URLs visited, {} pages captured, {} failed",
            report.visited,
            report.fragments.len(),
            report.failed
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DigestError;
    use crate::web::fetch::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory site keyed by URL string
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, (&'static str, String)>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn html(mut self, url: &str, body: &str) -> Self {
            self.pages
                .insert(url.to_string(), ("text/html; charset=utf-8", body.to_string()));
            self
        }

        fn other(mut self, url: &str, content_type: &'static str) -> Self {
            self.pages.insert(url.to_string(), (content_type, String::new()));
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some((content_type, body)) => Ok(FetchedPage {
                    url: url.clone(),
                    status: 200,
                    content_type: Some(content_type.to_string()),
                    body: body.clone(),
                }),
                None => Err(DigestError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn crawler(site: FakeSite, max_depth: u32) -> WebCrawler<FakeSite> {
        let config = CrawlConfig {
            max_depth,
            delay_ms: 0,
            ..CrawlConfig::default()
        };
        WebCrawler::new(site, &config)
    }

    fn urls(report: &CrawlReport) -> Vec<&str> {
        report.fragments.iter().map(|f| f.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_single_page_without_links() {
        let site = FakeSite::default().html("https://x.test/", "<main><p>Hello</p></main>");
        let report = crawler(site, 0).crawl("https://x.test/").await.unwrap();

        assert_eq!(report.fragments.len(), 1);
        assert_eq!(report.visited, 1);
        assert_eq!(report.fragments[0].markdown, "Hello");
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let site = FakeSite::default()
            .html("https://x.test/", r#"<a href="/a">a</a><a href="/b">b</a>"#)
            .html("https://x.test/a", r#"<p>A</p><a href="/a/deep">deep</a>"#)
            .html("https://x.test/b", "<p>B</p>")
            .html("https://x.test/a/deep", "<p>Deep</p>");
        let crawler = crawler(site, 2);
        let report = crawler.crawl("https://x.test").await.unwrap();

        assert_eq!(
            urls(&report),
            vec![
                "https://x.test/",
                "https://x.test/a",
                "https://x.test/b",
                "https://x.test/a/deep"
            ]
        );
        assert_eq!(report.fragments[3].depth, 2);
    }

    #[tokio::test]
    async fn test_depth_bound_stops_discovery() {
        let site = FakeSite::default()
            .html("https://x.test/", r#"<a href="/a">a</a>"#)
            .html("https://x.test/a", r#"<p>A</p><a href="/b">b</a>"#)
            .html("https://x.test/b", "<p>B</p>");
        let crawler = crawler(site, 1);
        let report = crawler.crawl("https://x.test/").await.unwrap();

        assert_eq!(report.visited, 2);
        assert_eq!(crawler.fetcher.requests(), vec!["https://x.test/", "https://x.test/a"]);
    }

    #[tokio::test]
    async fn test_each_url_fetched_once() {
        let site = FakeSite::default()
            .html(
                "https://x.test/",
                r##"<a href="/a">1</a><a href="/a/">2</a><a href="/a#top">3</a><a href="/">home</a>"##,
            )
            .html("https://x.test/a", r#"<p>A</p><a href="/">back</a>"#);
        let crawler = crawler(site, 5);
        let report = crawler.crawl("https://x.test/").await.unwrap();

        assert_eq!(report.visited, 2);
        assert_eq!(crawler.fetcher.requests(), vec!["https://x.test/", "https://x.test/a"]);
    }

    #[tokio::test]
    async fn test_out_of_scope_links_are_not_followed() {
        let site = FakeSite::default().html(
            "https://x.test/",
            r#"<p>Home</p>
               <a href="https://other.test/">host</a>
               <a href="http://x.test/plain">scheme</a>
               <a href="https://x.test:8443/port">port</a>
               <a href="mailto:team@x.test">mail</a>
               <a href="javascript:void(0)">js</a>"#,
        );
        let crawler = crawler(site, 3);
        let report = crawler.crawl("https://x.test/").await.unwrap();

        assert_eq!(report.visited, 1);
        assert_eq!(crawler.fetcher.requests(), vec!["https://x.test/"]);
    }

    #[tokio::test]
    async fn test_links_in_stripped_regions_are_followed() {
        let site = FakeSite::default()
            .html(
                "https://x.test/",
                r#"<nav><a href="/guide">Guide</a></nav><main><p>Home</p></main>"#,
            )
            .html("https://x.test/guide", "<p>Guide</p>");
        let report = crawler(site, 1).crawl("https://x.test/").await.unwrap();

        assert_eq!(urls(&report), vec!["https://x.test/", "https://x.test/guide"]);
        assert!(!report.fragments[0].markdown.contains("Guide"));
    }

    #[tokio::test]
    async fn test_failures_and_non_html_are_skipped() {
        let site = FakeSite::default()
            .html(
                "https://x.test/",
                r#"<p>Home</p><a href="/missing">m</a><a href="/data.json">d</a><a href="/ok">ok</a>"#,
            )
            .other("https://x.test/data.json", "application/json")
            .html("https://x.test/ok", "<p>Fine</p>");
        let report = crawler(site, 1).crawl("https://x.test/").await.unwrap();

        assert_eq!(urls(&report), vec!["https://x.test/", "https://x.test/ok"]);
        assert_eq!(report.visited, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped_non_html, 1);
    }

    #[tokio::test]
    async fn test_empty_pages_produce_no_fragment() {
        let site = FakeSite::default().html("https://x.test/", "<script>app()</script>");
        let report = crawler(site, 0).crawl("https://x.test/").await.unwrap();

        assert!(report.fragments.is_empty());
        assert_eq!(report.visited, 1);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_fatal() {
        let err = crawler(FakeSite::default(), 1)
            .crawl("not a url")
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
