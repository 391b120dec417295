// src/utils/url.rs

//! Link normalization.
//!
//! Turns a raw `href` into the canonical absolute link used as the
//! deduplication key.

/// Resolve a raw href against a site's base URL.
///
/// Returns `None` for hrefs that do not navigate anywhere: empty strings,
/// fragment-only links and `javascript:` pseudo links. Any `#fragment` is
/// dropped so links into the same document share one key.
///
/// Relative hrefs are joined by plain concatenation (`base` without its
/// trailing slash, `/`, `href` without its leading slashes). `../` segments
/// and query-only hrefs are not resolved.
///
/// # Examples
/// ```
/// use pharmawatch::utils::url::normalize;
///
/// assert_eq!(
///     normalize("/jobs/1", "https://x.org/").as_deref(),
///     Some("https://x.org/jobs/1")
/// );
/// assert_eq!(normalize("#", "https://x.org/"), None);
/// ```
pub fn normalize(raw_href: &str, base_url: &str) -> Option<String> {
    let href = raw_href.trim();

    if href.is_empty() || href.starts_with('#') || is_script_href(href) {
        return None;
    }
    let href = strip_fragment(href);

    if has_scheme(href) {
        return Some(href.to_string());
    }

    let base = base_url.trim().trim_end_matches('/');
    let path = href.trim_start_matches('/');
    Some(format!("{base}/{path}"))
}

fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(head, _)| head)
}

fn is_script_href(href: &str) -> bool {
    href.get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
}

/// True when the href carries its own scheme (`https:`, `mailto:`, ...).
///
/// Protocol-relative `//host/path` is not treated as absolute.
fn has_scheme(href: &str) -> bool {
    url::Url::parse(href).is_ok()
}
