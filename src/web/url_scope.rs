//! URL normalization and same-origin scope guard.

use url::{Origin, Url};

use crate::constants::crawl::NON_CONTENT_SCHEMES;
use crate::types::{DigestError, Result};

/// Resolve `raw` against `base` into canonical form.
///
/// The fragment is dropped and trailing slashes are removed from the path
/// (the root path `/` is kept). Returns `None` when `raw` cannot be parsed;
/// callers skip such links silently.
pub fn normalize(raw: &str, base: &Url) -> Option<Url> {
    let mut url = base.join(raw.trim()).ok()?;
    url.set_fragment(None);
    strip_trailing_slash(&mut url);
    Some(url)
}

/// Parse and normalize a crawl seed. Failure is fatal for the crawl.
pub fn normalize_seed(raw: &str) -> Result<Url> {
    let base = Url::parse(raw.trim()).map_err(|e| DigestError::invalid_url(raw, e))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(DigestError::invalid_url(
            raw,
            format!("unsupported scheme '{}'", base.scheme()),
        ));
    }
    normalize(raw, &base).ok_or_else(|| DigestError::invalid_url(raw, "normalization failed"))
}

fn strip_trailing_slash(url: &mut Url) {
    if url.cannot_be_a_base() || url.query().is_some() {
        return;
    }
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/".to_string(),
            rest => rest.to_string(),
        };
        url.set_path(&trimmed);
    }
}

/// Whether the scheme can point at crawlable content
pub fn is_content_scheme(url: &Url) -> bool {
    !NON_CONTENT_SCHEMES.contains(&url.scheme())
}

/// Fixed crawl boundary established from the seed URL
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    origin: Origin,
}

impl ScopeGuard {
    pub fn new(seed: &Url) -> Self {
        Self {
            origin: seed.origin(),
        }
    }

    /// Same scheme, host and port as the seed
    pub fn in_scope(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    /// Content scheme check followed by the origin check
    pub fn admits(&self, url: &Url) -> bool {
        is_content_scheme(url) && self.in_scope(url)
    }

    pub fn origin(&self) -> String {
        self.origin.ascii_serialization()
    }
}
