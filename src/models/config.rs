// src/models/config.rs

//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ExtractionRule, SiteConfig};
use crate::services::NoticeExtractor;

/// Environment variable holding the Telegram bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the Telegram chat identifier.
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Durable state locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Messaging settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Terms that make a notice relevant (case-insensitive substrings)
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,

    /// Pages to poll, in processing order
    #[serde(default = "defaults::sites")]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.storage.max_links == Some(0) {
            return Err(AppError::validation("storage.max_links must be > 0 when set"));
        }
        if self.notify.max_title_chars == 0 {
            return Err(AppError::validation("notify.max_title_chars must be > 0"));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::validation("No keywords defined"));
        }
        if self.sites.is_empty() {
            return Err(AppError::validation("No sites defined"));
        }

        for site in &self.sites {
            for (field, value) in [("url", &site.url), ("base_url", &site.base_url)] {
                let parsed = Url::parse(value).map_err(|e| {
                    AppError::validation(format!("site '{}': {} {:?}: {}", site.name, field, value, e))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::validation(format!(
                        "site '{}': {} must be http(s), got {:?}",
                        site.name, field, value
                    )));
                }
            }
            if let ExtractionRule::Container(selector) = &site.rule {
                if selector.trim().is_empty() {
                    return Err(AppError::validation(format!(
                        "site '{}': container selector is empty",
                        site.name
                    )));
                }
            }
            NoticeExtractor::new(&site.rule)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
            notify: NotifyConfig::default(),
            keywords: defaults::keywords(),
            sites: defaults::sites(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (pages and the messaging sink)
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Where the watcher keeps its memory between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every link already notified
    #[serde(default = "defaults::links_path")]
    pub path: PathBuf,

    /// JSON file holding the sites currently known to be unreachable
    #[serde(default = "defaults::outage_path")]
    pub outage_path: PathBuf,

    /// Keep at most this many links, evicting the oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_links: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: defaults::links_path(),
            outage_path: defaults::outage_path(),
            max_links: None,
        }
    }
}

/// When an unreachable site produces an alert message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiteDownAlerts {
    /// Never alert; failures are only logged
    Off,
    /// Alert on every pass the site is unreachable
    EveryPass,
    /// Alert when a site goes down, then stay quiet until it recovers
    #[default]
    OncePerOutage,
}

/// Messaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Telegram Bot API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Template for a matching notice (`{site}`, `{title}`, `{link}`)
    #[serde(default = "defaults::alert_template")]
    pub alert_template: String,

    /// Template for an unreachable site (`{site}`, `{url}`, `{error}`)
    #[serde(default = "defaults::site_down_template")]
    pub site_down_template: String,

    /// Unreachable-site alert policy
    #[serde(default)]
    pub site_down_alerts: SiteDownAlerts,

    /// Longer notice texts are cut to this many characters
    #[serde(default = "defaults::max_title_chars")]
    pub max_title_chars: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            alert_template: defaults::alert_template(),
            site_down_template: defaults::site_down_template(),
            site_down_alerts: SiteDownAlerts::default(),
            max_title_chars: defaults::max_title_chars(),
        }
    }
}

/// Secrets for the messaging channel.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub chat_id: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Read both secrets from the process environment.
    ///
    /// A missing or blank variable is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both secrets through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::MissingCredential(key.to_string()))
        };
        Ok(Self::new(fetch(TOKEN_ENV)?, fetch(CHAT_ID_ENV)?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::models::{ExtractionRule, SiteConfig};

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pharmawatch/0.1; recruitment notice checker)".into()
    }
    pub fn timeout() -> u64 {
        15
    }

    // Storage defaults
    pub fn links_path() -> PathBuf {
        PathBuf::from("sent_links.json")
    }
    pub fn outage_path() -> PathBuf {
        PathBuf::from("site_outages.json")
    }

    // Notify defaults
    pub fn api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn alert_template() -> String {
        "🚨 <b>Pharma Alert from {site}!</b>\n\n\
         <b>Title:</b> {title}\n\
         <b>Link:</b> <a href=\"{link}\">Click Here to View</a>"
            .into()
    }
    pub fn site_down_template() -> String {
        "⚠️ <b>{site} is unreachable</b>\n\n\
         <b>URL:</b> {url}\n\
         <b>Error:</b> {error}"
            .into()
    }
    pub fn max_title_chars() -> usize {
        600
    }

    // Keyword defaults
    pub fn keywords() -> Vec<String> {
        [
            "pharmacist",
            "pharma",
            "pharmacy",
            "b.pharm",
            "d.pharm",
            "drug inspector",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // Site defaults
    pub fn sites() -> Vec<SiteConfig> {
        vec![
            SiteConfig::new(
                "PCI (Announcements)",
                "https://www.pci.nic.in/Announcements.html",
                "https://www.pci.nic.in",
                ExtractionRule::container("li"),
            ),
            SiteConfig::new(
                "AIIMS Delhi (Recruitment)",
                "https://www.aiims.edu/en/notices/recruitment/aiims-recruitment.html",
                "https://www.aiims.edu",
                ExtractionRule::container("tr"),
            ),
            SiteConfig::new(
                "AIIMS Bhubaneswar",
                "https://aiimsbhubaneswar.nic.in/advertisement/",
                "https://aiimsbhubaneswar.nic.in",
                ExtractionRule::container("tr"),
            ),
            SiteConfig::new(
                "NIPER Guwahati",
                "https://niperguwahati.ac.in/recruitment.php",
                "https://niperguwahati.ac.in",
                ExtractionRule::container("tr"),
            ),
            SiteConfig::new(
                "RRB Bhopal (Paramedical)",
                "https://www.rrbbpl.nic.in/paramedical-cat.htm",
                "https://www.rrbbpl.nic.in",
                ExtractionRule::container("tr"),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut config = Config::default();
        config.sites[0].base_url = "/relative".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.sites[0].rule = ExtractionRule::container("[[invalid");
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_max_links() {
        let mut config = Config::default();
        config.storage.max_links = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            keywords = ["nurse"]

            [notify]
            site_down_alerts = "every_pass"
            "#,
        )
        .unwrap();

        assert_eq!(config.keywords, vec!["nurse"]);
        assert_eq!(config.notify.site_down_alerts, SiteDownAlerts::EveryPass);
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.sites.len(), 5);
        assert_eq!(config.storage.max_links, None);
    }

    #[test]
    fn credentials_require_both_values() {
        let missing_chat = Credentials::from_lookup(|key| match key {
            TOKEN_ENV => Some("123:abc".to_string()),
            _ => None,
        });
        assert!(matches!(
            missing_chat,
            Err(AppError::MissingCredential(name)) if name == CHAT_ID_ENV
        ));

        let blank_token = Credentials::from_lookup(|_| Some("   ".to_string()));
        assert!(blank_token.is_err());

        let ok = Credentials::from_lookup(|key| Some(format!("value-{key}"))).unwrap();
        assert_eq!(ok.chat_id, format!("value-{CHAT_ID_ENV}"));
    }

    #[test]
    fn credentials_debug_hides_token() {
        let creds = Credentials::new("secret-token", "42");
        assert!(!format!("{creds:?}").contains("secret-token"));
    }
}
