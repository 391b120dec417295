// src/models/site.rs

//! Target page definitions.

use serde::{Deserialize, Serialize};

/// How candidate notices are picked out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionRule {
    /// Every node matching the CSS selector (usually a bare tag such as
    /// `tr` or `li`) is one notice; its link is the first anchor inside it.
    Container(String),

    /// Every anchor on the page is one notice.
    Anchors,
}

impl ExtractionRule {
    /// Container rule over a tag or selector.
    pub fn container(selector: impl Into<String>) -> Self {
        Self::Container(selector.into())
    }
}

/// One page to poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name used in notifications (not required to be unique)
    pub name: String,

    /// Absolute URL of the notices/recruitment page
    pub url: String,

    /// Absolute origin used to resolve relative links
    pub base_url: String,

    /// Which nodes constitute candidate notices
    pub rule: ExtractionRule,

    /// Verify the TLS certificate chain (some sites serve broken chains)
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_verify_tls() -> bool {
    true
}

impl SiteConfig {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        base_url: impl Into<String>,
        rule: ExtractionRule,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            base_url: base_url.into(),
            rule,
            verify_tls: true,
        }
    }

    /// Disable certificate verification for this site.
    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        sites: Vec<SiteConfig>,
    }

    #[test]
    fn test_rule_deserializes_from_toml() {
        let toml_str = r#"
            [[sites]]
            name = "Rows"
            url = "https://a.example/jobs"
            base_url = "https://a.example"
            rule = { container = "tr" }

            [[sites]]
            name = "Links"
            url = "https://b.example/notices"
            base_url = "https://b.example"
            rule = "anchors"
            verify_tls = false
        "#;

        let parsed: Wrapper = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.sites[0].rule, ExtractionRule::container("tr"));
        assert!(parsed.sites[0].verify_tls);
        assert_eq!(parsed.sites[1].rule, ExtractionRule::Anchors);
        assert!(!parsed.sites[1].verify_tls);
    }
}
