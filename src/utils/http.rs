// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured blocking HTTP client.
///
/// `verify_tls = false` accepts invalid certificate chains; it is only
/// used for sites explicitly configured that way.
pub fn create_client(config: &HttpConfig, verify_tls: bool) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(!verify_tls)
        .build()?)
}
