// src/search/cloudant.rs
//
// HTTP client for a Cloudant/CouchDB search index:
// POST {base}/{db}/_design/{ddoc}/_search/{index}

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::search::{SearchError, SearchPage, SearchRequest, SearchService};
use crate::utils::config::{Credentials, SearchConfig};

const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct CloudantClient {
    http_client: Client,
    search_url: Url,
    credentials: Option<Credentials>,
}

impl CloudantClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("hubfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            search_url: config.search_url()?,
            credentials: config.credentials.clone(),
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    fn build_request(&self, request: &SearchRequest) -> reqwest::RequestBuilder {
        let builder = self
            .http_client
            .post(self.search_url.clone())
            .json(request);
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        }
    }
}

#[async_trait]
impl SearchService for CloudantClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        debug!(
            "POST {} (limit={}, bookmark={})",
            self.search_url,
            request.limit,
            request.bookmark.is_some()
        );

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(SearchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: truncate(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(SearchError::Transport)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
