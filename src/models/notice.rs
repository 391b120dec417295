// src/models/notice.rs

//! Notice data structures.

/// A notice as extracted from a page, before normalization and matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNotice {
    /// Full text content of the notice node
    pub raw_text: String,

    /// Link target as written in the markup, if any
    pub raw_href: Option<String>,
}

impl CandidateNotice {
    pub fn new(raw_text: impl Into<String>, raw_href: Option<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            raw_href,
        }
    }

    /// Text with runs of whitespace collapsed to single spaces.
    pub fn display_text(&self) -> String {
        self.raw_text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// A keyword-matching notice with a canonical link, ready to be announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Name of the site it was found on
    pub site: String,

    /// Whitespace-normalized notice text
    pub title: String,

    /// Canonical absolute link
    pub link: String,
}

impl Notice {
    /// Format notice for display using a template.
    ///
    /// Supported placeholders: `{site}`, `{title}`, `{link}`.
    /// Values are HTML-escaped and the title is cut to `max_title_chars`.
    pub fn format(&self, template: &str, max_title_chars: usize) -> String {
        let site = escape_html(&self.site);
        let title = escape_html(&truncate_chars(&self.title, max_title_chars));
        let link = escape_html(&self.link);
        fill_template(
            template,
            &[("site", site.as_str()), ("title", title.as_str()), ("link", link.as_str())],
        )
    }
}

/// Replace `{key}` placeholders in one left-to-right scan.
///
/// Substituted text is never rescanned. Unknown placeholders are kept as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(*key)?
                .strip_prefix('}')
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape the characters Telegram's HTML parse mode cares about.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push('…');
    cut
}
