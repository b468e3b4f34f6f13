//! Content extraction from fetched HTML.
//!
//! Link discovery reads the document as fetched. Content is taken from a copy
//! with non-content elements removed, narrowed to the most specific region
//! present.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::constants::crawl::{CONTENT_REGIONS, NOISE_SELECTOR};

use super::markdown::element_to_markdown;

static NOISE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(NOISE_SELECTOR).expect("valid noise selector"));

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static REGIONS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_REGIONS
        .iter()
        .map(|region| Selector::parse(region).expect("valid region selector"))
        .collect()
});

/// Markdown body and raw link targets of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub markdown: String,
    /// `href` values in document order, unresolved
    pub links: Vec<String>,
}

pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);
    let links = collect_links(&document);

    let stripped = strip_noise(document);
    let markdown = element_to_markdown(content_region(&stripped));

    ExtractedPage { markdown, links }
}

fn collect_links(document: &Html) -> Vec<String> {
    document
        .select(&ANCHORS)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_noise(document: Html) -> Html {
    let mut stripped = document;
    let noise: Vec<_> = stripped.select(&NOISE).map(|element| element.id()).collect();
    for id in noise {
        // Nested matches may already be gone with their ancestor
        if let Some(mut node) = stripped.tree.get_mut(id) {
            node.detach();
        }
    }
    stripped
}

fn content_region(document: &Html) -> ElementRef<'_> {
    REGIONS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .unwrap_or_else(|| document.root_element())
}
