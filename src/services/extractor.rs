// src/services/extractor.rs

//! Notice extraction.
//!
//! Picks candidate notices out of a parsed page according to the site's
//! [`ExtractionRule`].

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CandidateNotice, ExtractionRule};

/// Compiled extraction rule for one site.
pub struct NoticeExtractor {
    nodes: Selector,
    anchor: Selector,
}

impl NoticeExtractor {
    /// Compile the selectors for a rule.
    pub fn new(rule: &ExtractionRule) -> Result<Self> {
        let nodes = match rule {
            ExtractionRule::Container(selector) => Self::parse_selector(selector)?,
            ExtractionRule::Anchors => Self::parse_selector("a")?,
        };
        Ok(Self {
            nodes,
            anchor: Self::parse_selector("a")?,
        })
    }

    /// Candidate notices in document order.
    ///
    /// The iterator is lazy; call again to restart from the top.
    pub fn extract<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = CandidateNotice> + 'a {
        document
            .select(&self.nodes)
            .map(move |node| CandidateNotice {
                raw_text: node.text().collect(),
                raw_href: self.link_of(node),
            })
    }

    /// The node's own href if it is an anchor, else its first anchor's.
    fn link_of(&self, node: ElementRef<'_>) -> Option<String> {
        let anchor = if node.value().name() == "a" {
            Some(node)
        } else {
            node.select(&self.anchor).next()
        };
        anchor
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
