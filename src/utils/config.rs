// src/utils/config.rs
//! Search service settings read from the environment.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::utils::constants::MAX_SEARCH_PAGE_SIZE;

pub const DEFAULT_CLOUDANT_URL: &str = "https://mikerhodes.cloudant.com";
pub const DEFAULT_CLOUDANT_DB: &str = "airportdb";
pub const DEFAULT_CLOUDANT_DDOC: &str = "view1";
pub const DEFAULT_CLOUDANT_INDEX: &str = "geo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub db: String,
    pub ddoc: String,
    pub index: String,
    pub credentials: Option<Credentials>,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub max_retries: u32,
    /// Overall budget for one search, across all pages and retries.
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLOUDANT_URL.to_string(),
            db: DEFAULT_CLOUDANT_DB.to_string(),
            ddoc: DEFAULT_CLOUDANT_DDOC.to_string(),
            index: DEFAULT_CLOUDANT_INDEX.to_string(),
            credentials: None,
            page_size: MAX_SEARCH_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            deadline: None,
        }
    }
}

impl SearchConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let credentials = match (lookup("CLOUDANT_USERNAME"), lookup("CLOUDANT_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() => Some(Credentials {
                username,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("Only one of CLOUDANT_USERNAME/CLOUDANT_PASSWORD is set; connecting without credentials");
                None
            }
            _ => None,
        };

        let page_size: u32 = parse_or(&lookup, "SEARCH_PAGE_SIZE", defaults.page_size);
        let page_size = if (1..=MAX_SEARCH_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            warn!(
                "SEARCH_PAGE_SIZE={} outside 1..={}, clamping",
                page_size, MAX_SEARCH_PAGE_SIZE
            );
            page_size.clamp(1, MAX_SEARCH_PAGE_SIZE)
        };

        let deadline = lookup("SEARCH_DEADLINE_SECS").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            Ok(_) => None,
            Err(_) => {
                warn!("Ignoring unparseable SEARCH_DEADLINE_SECS={:?}", raw);
                None
            }
        });

        Self {
            base_url: text("CLOUDANT_URL", defaults.base_url),
            db: text("CLOUDANT_DB", defaults.db),
            ddoc: text("CLOUDANT_DDOC", defaults.ddoc),
            index: text("CLOUDANT_INDEX", defaults.index),
            credentials,
            page_size,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SEARCH_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            max_retries: parse_or(&lookup, "SEARCH_MAX_RETRIES", defaults.max_retries),
            deadline,
        }
    }

    /// Full URL of the search index endpoint.
    pub fn search_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid CLOUDANT_URL: {}", self.base_url))?;
        if base.cannot_be_a_base() {
            bail!("CLOUDANT_URL cannot be used as a base URL: {}", self.base_url);
        }
        let mut url = base;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("CLOUDANT_URL cannot be used as a base URL"))?
            .pop_if_empty()
            .extend([
                self.db.as_str(),
                "_design",
                self.ddoc.as_str(),
                "_search",
                self.index.as_str(),
            ]);
        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.search_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("CLOUDANT_URL must use http or https, got {}", url.scheme());
        }
        if self.db.is_empty() || self.ddoc.is_empty() || self.index.is_empty() {
            bail!("CLOUDANT_DB, CLOUDANT_DDOC and CLOUDANT_INDEX must not be empty");
        }
        Ok(())
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!(
            "Search index: {}/{}/_design/{}/_search/{}",
            self.base_url.trim_end_matches('/'),
            self.db,
            self.ddoc,
            self.index
        );
        info!(
            "   page size {}, timeout {:?}, retries {}, deadline {:?}, authenticated: {}",
            self.page_size,
            self.request_timeout,
            self.max_retries,
            self.deadline,
            self.credentials.is_some()
        );
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
