// src/services/fetcher.rs

//! Page fetching.

use reqwest::blocking::Client;

use crate::error::{FetchError, Result};
use crate::models::{HttpConfig, SiteConfig};
use crate::utils::http::create_client;

/// Raw page returned by a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Retrieves the document for one site.
pub trait Fetcher {
    fn fetch(&self, site: &SiteConfig) -> std::result::Result<FetchedPage, FetchError>;
}

/// Blocking HTTP fetcher with one client per TLS policy.
pub struct HttpFetcher {
    verified: Client,
    unverified: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            verified: create_client(config, true)?,
            unverified: create_client(config, false)?,
        })
    }

    fn client_for(&self, site: &SiteConfig) -> &Client {
        if site.verify_tls {
            &self.verified
        } else {
            &self.unverified
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, site: &SiteConfig) -> std::result::Result<FetchedPage, FetchError> {
        let response = self
            .client_for(site)
            .get(&site.url)
            .send()
            .map_err(FetchError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().map_err(FetchError::from_body)?;
        log::debug!(
            "Fetched {} ({}): {} bytes",
            site.name,
            status.as_u16(),
            body.len()
        );

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}
