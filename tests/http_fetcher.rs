mod support;

use std::time::Duration;

use pharmawatch::error::FetchError;
use pharmawatch::models::{ExtractionRule, HttpConfig, SiteConfig};
use pharmawatch::services::{Fetcher, HttpFetcher};

use support::{StubResponse, StubServer, closed_port_url};

fn site_at(url: &str) -> SiteConfig {
    SiteConfig::new("Stub", url, url, ExtractionRule::container("tr"))
}

#[test]
fn fetch_returns_body_and_sends_user_agent() {
    let server = StubServer::spawn(|_| StubResponse::ok("<table><tr><td>Pharmacist</td></tr></table>"));
    let config = HttpConfig::default();
    let fetcher = HttpFetcher::new(&config).unwrap();

    let page = fetcher
        .fetch(&site_at(&format!("{}/recruitment.html", server.base_url)))
        .unwrap();

    assert_eq!(page.status, 200);
    assert!(page.body.contains("Pharmacist"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/recruitment.html");
    assert_eq!(requests[0].user_agent.as_deref(), Some(config.user_agent.as_str()));
}

#[test]
fn fetch_reports_non_success_status() {
    let server = StubServer::spawn(|_| StubResponse::status(503, "maintenance"));
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();

    let err = fetcher.fetch(&site_at(&server.base_url)).unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
}

#[test]
fn fetch_reports_unreachable_site() {
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let result = fetcher.fetch(&site_at(&closed_port_url()));
    assert!(result.is_err());
}

#[test]
fn fetch_times_out() {
    let server = StubServer::spawn(|_| StubResponse::ok("late").delayed(Duration::from_secs(3)));
    let config = HttpConfig {
        timeout_secs: 1,
        ..HttpConfig::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();

    let err = fetcher.fetch(&site_at(&server.base_url)).unwrap_err();
    assert!(matches!(err, FetchError::Timeout));
}

#[test]
fn insecure_site_still_fetches_over_http() {
    let server = StubServer::spawn(|_| StubResponse::ok("ok"));
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();

    let page = fetcher.fetch(&site_at(&server.base_url).insecure()).unwrap();
    assert_eq!(page.body, "ok");
}
