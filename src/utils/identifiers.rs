//! Canonical forms for DOIs and URLs.
//!
//! Both normalizers return `None` instead of failing: a missing or malformed
//! identifier only means that signal cannot be used for a comparison.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Resolver and scheme prefixes, matched after lower-casing
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "dx.doi.org/",
    "doi:",
];

static DOI_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn doi_pattern() -> Option<&'static Regex> {
    DOI_PATTERN
        .get_or_init(|| Regex::new(r"^10\.\d{4,}(?:\.\d+)*/\S+$").ok())
        .as_ref()
}

/// Canonicalize a DOI
///
/// Strips resolver prefixes such as `https://doi.org/` or `doi:` and lower-cases
/// the rest. Returns `None` for empty input or anything not shaped like
/// `10.<registrant>/<suffix>`.
pub fn normalize_doi(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let mut doi = lower.as_str();
    for prefix in DOI_PREFIXES {
        if let Some(rest) = doi.strip_prefix(prefix) {
            doi = rest.trim_start();
            break;
        }
    }

    if doi_pattern()?.is_match(doi) {
        Some(doi.to_string())
    } else {
        None
    }
}

/// Canonicalize a URL
///
/// The canonical form drops the scheme, a leading `www.` and exactly one
/// trailing `/` from the path. The host is lower-cased while path and query
/// keep their case. Fragments are discarded. Inputs without a scheme are read
/// as `http`; any other scheme yields `None`.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return None;
    } else {
        format!("http://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }

    let mut canonical = host.to_string();
    if let Some(port) = parsed.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }

    let path = parsed.path();
    canonical.push_str(path.strip_suffix('/').unwrap_or(path));

    if let Some(query) = parsed.query() {
        canonical.push('?');
        canonical.push_str(query);
    }

    Some(canonical)
}
