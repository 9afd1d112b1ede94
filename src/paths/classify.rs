use super::join::join_urls;

const SCHEME_SEPARATOR: &str = "://";

/// How a URL in the config relates to the site's base href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Carries a scheme (`https://cdn.example.com/...`) and is never rewritten.
    FullyQualified,
    /// Starts with `/` and is already anchored at the origin root.
    SiteAbsolute,
    /// Relative to the base href the site is served under.
    RootRelative,
}

/// Classify a raw URL or glob from the config.
pub fn classify_url(url: &str) -> UrlKind {
    if url.contains(SCHEME_SEPARATOR) {
        UrlKind::FullyQualified
    } else if url.starts_with('/') {
        UrlKind::SiteAbsolute
    } else {
        UrlKind::RootRelative
    }
}

/// Resolve a URL against the base href. Only root-relative URLs are rewritten.
pub fn resolve_url(url: &str, base_href: &str) -> String {
    match classify_url(url) {
        UrlKind::FullyQualified | UrlKind::SiteAbsolute => url.to_string(),
        UrlKind::RootRelative => join_urls(base_href, url),
    }
}
