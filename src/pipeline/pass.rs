// src/pipeline/pass.rs

//! One full pass over every configured site.
//!
//! ```text
//! LOAD_MEMORY
//!   └─ per site: FETCH → EXTRACT
//!        └─ per candidate: NORMALIZE → MATCH → DEDUP-CHECK → NOTIFY → RECORD
//! PERSIST_IF_CHANGED
//! ```
//!
//! Every failure below the pass is contained to its site or notice and
//! logged; the pass itself always runs to the end.

use std::collections::HashSet;

use scraper::Html;

use crate::error::FetchError;
use crate::models::{Config, Notice, SiteConfig, SiteDownAlerts, escape_html, fill_template};
use crate::services::{Fetcher, KeywordMatcher, NoticeExtractor, Notifier};
use crate::storage::{DedupStore, SentLinks};
use crate::utils::log::{header, summary};
use crate::utils::normalize;

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub sites_checked: usize,
    pub sites_failed: usize,
    pub candidates: usize,
    pub matches: usize,
    pub already_known: usize,
    pub notified: usize,
    pub delivery_failures: usize,
    pub alerts_sent: usize,
    /// Link memory was written at the end of the pass
    pub persisted: bool,
    /// Why writing link memory failed, if it did
    pub persist_error: Option<String>,
}

impl PassReport {
    pub fn persist_failed(&self) -> bool {
        self.persist_error.is_some()
    }
}

/// Mutable state threaded through one pass.
struct PassState {
    links: SentLinks,
    outages: SentLinks,
    attempted: HashSet<String>,
    report: PassReport,
}

/// Drives a pass. The only writer of link memory.
pub struct Orchestrator<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
    notifier: &'a dyn Notifier,
    links: &'a dyn DedupStore,
    outages: &'a dyn DedupStore,
    matcher: KeywordMatcher,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn Fetcher,
        notifier: &'a dyn Notifier,
        links: &'a dyn DedupStore,
        outages: &'a dyn DedupStore,
    ) -> Self {
        Self {
            config,
            fetcher,
            notifier,
            links,
            outages,
            matcher: KeywordMatcher::new(&config.keywords),
        }
    }

    /// Run one pass over all sites in configuration order.
    pub fn run_pass(&self) -> PassReport {
        header("pharmawatch: checking recruitment pages");

        let tracks_outages = self.config.notify.site_down_alerts == SiteDownAlerts::OncePerOutage;
        let mut state = PassState {
            links: self.links.load(),
            outages: if tracks_outages {
                self.outages.load()
            } else {
                SentLinks::new()
            },
            attempted: HashSet::new(),
            report: PassReport::default(),
        };
        let outages_before = state.outages.clone();
        log::info!(
            "Loaded {} known link(s); checking {} site(s)",
            state.links.len(),
            self.config.sites.len()
        );

        for site in &self.config.sites {
            state.report.sites_checked += 1;
            self.check_site(site, &mut state);
        }

        self.persist_links(&mut state);
        self.prune_outages(&mut state.outages);
        if tracks_outages && state.outages != outages_before {
            if let Err(e) = self.outages.save(&state.outages) {
                log::error!("Failed to save outage memory: {}", e);
            }
        }

        let report = state.report;
        summary(
            "Pass complete",
            &[
                ("Sites checked", report.sites_checked.to_string()),
                ("Sites failed", report.sites_failed.to_string()),
                ("Candidates", report.candidates.to_string()),
                ("Keyword matches", report.matches.to_string()),
                ("Already notified", report.already_known.to_string()),
                ("Newly notified", report.notified.to_string()),
                ("Delivery failures", report.delivery_failures.to_string()),
                ("Site-down alerts", report.alerts_sent.to_string()),
            ],
        );
        report
    }

    fn check_site(&self, site: &SiteConfig, state: &mut PassState) {
        log::info!("Checking site: {} ({})", site.name, site.url);

        let page = match self.fetcher.fetch(site) {
            Ok(page) => page,
            Err(e) => {
                state.report.sites_failed += 1;
                log::error!("[{}] Could not fetch {}: {}", site.name, site.url, e);
                self.alert_site_down(site, &e, state);
                return;
            }
        };
        if state.outages.remove(&site.url) {
            log::info!("[{}] Site is reachable again", site.name);
        }

        let extractor = match NoticeExtractor::new(&site.rule) {
            Ok(extractor) => extractor,
            Err(e) => {
                state.report.sites_failed += 1;
                log::error!("[{}] Invalid extraction rule: {}", site.name, e);
                return;
            }
        };

        let document = Html::parse_document(&page.body);
        let mut candidates = 0;
        let mut matches = 0;

        for candidate in extractor.extract(&document) {
            candidates += 1;

            let link = candidate
                .raw_href
                .as_deref()
                .and_then(|href| normalize(href, &site.base_url));

            let Some(keyword) = self.matcher.matched_keyword(&candidate.raw_text) else {
                continue;
            };
            let title = candidate.display_text();

            let Some(link) = link else {
                log::debug!("[{}] Match without usable link skipped: {}", site.name, title);
                continue;
            };
            matches += 1;

            if state.links.contains(&link) {
                state.report.already_known += 1;
                log::debug!("[{}] Already notified: {}", site.name, link);
                continue;
            }
            if !state.attempted.insert(link.clone()) {
                log::debug!("[{}] Already attempted this pass: {}", site.name, link);
                continue;
            }

            log::debug!("[{}] Keyword '{}' in: {}", site.name, keyword, title);
            let notice = Notice {
                site: site.name.clone(),
                title,
                link,
            };
            self.announce(notice, state);
        }

        state.report.candidates += candidates;
        state.report.matches += matches;

        if candidates == 0 {
            log::warn!(
                "[{}] No items found with the extraction rule; the page structure may have changed",
                site.name
            );
        } else if matches == 0 {
            log::info!("[{}] No notices matching keywords ({} items)", site.name, candidates);
        }
    }

    fn announce(&self, notice: Notice, state: &mut PassState) {
        let message = notice.format(
            &self.config.notify.alert_template,
            self.config.notify.max_title_chars,
        );
        let result = self.notifier.notify(&message);

        if result.delivered {
            log::info!("[{}] Notification sent: {}", notice.site, notice.link);
            state.links.insert(notice.link);
            state.report.notified += 1;
        } else {
            state.report.delivery_failures += 1;
            log::warn!(
                "[{}] Notification failed for {} ({:?}): {}; will retry next pass",
                notice.site,
                notice.link,
                result.failure,
                result.detail.as_deref().unwrap_or("no detail")
            );
        }
    }

    fn alert_site_down(&self, site: &SiteConfig, error: &FetchError, state: &mut PassState) {
        let policy = self.config.notify.site_down_alerts;
        match policy {
            SiteDownAlerts::Off => return,
            SiteDownAlerts::OncePerOutage if state.outages.contains(&site.url) => {
                log::debug!("[{}] Outage already reported", site.name);
                return;
            }
            _ => {}
        }

        let name = escape_html(&site.name);
        let url = escape_html(&site.url);
        let detail = escape_html(&error.to_string());
        let message = fill_template(
            &self.config.notify.site_down_template,
            &[("site", name.as_str()), ("url", url.as_str()), ("error", detail.as_str())],
        );
        let result = self.notifier.notify(&message);

        if result.delivered {
            state.report.alerts_sent += 1;
            if policy == SiteDownAlerts::OncePerOutage {
                state.outages.insert(site.url.clone());
            }
        } else {
            log::warn!(
                "[{}] Site-down alert failed: {}",
                site.name,
                result.detail.as_deref().unwrap_or("no detail")
            );
        }
    }

    /// Forget outages of sites that are no longer configured.
    fn prune_outages(&self, outages: &mut SentLinks) {
        let before = outages.len();
        outages.retain(|url| self.config.sites.iter().any(|site| site.url == url));
        let dropped = before - outages.len();
        if dropped > 0 {
            log::info!("Dropped {} outage record(s) for removed sites", dropped);
        }
    }

    fn persist_links(&self, state: &mut PassState) {
        if state.report.notified == 0 {
            log::info!("No new links this pass; memory left untouched");
            return;
        }

        match self.links.save(&state.links) {
            Ok(()) => {
                state.report.persisted = true;
                log::info!("Saved {} known link(s)", state.links.len());
            }
            Err(e) => {
                log::error!(
                    "Failed to save link memory: {}. {} new link(s) may be notified again",
                    e,
                    state.report.notified
                );
                state.report.persist_error = Some(e.to_string());
            }
        }
    }
}
