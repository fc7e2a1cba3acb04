//! Blocking MediaWiki API client

use crate::error::Result;
use banner_core::{extract_content, ContentFetcher, PageCollection, QueryResponse, MAX_CONTINUES};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("banner-cli/", env!("CARGO_PKG_VERSION"));

/// Client for one wiki's `api.php`
pub struct WikiClient {
    api_url: String,
    http: Client,
}

impl WikiClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            api_url: api_url.into(),
            http,
        })
    }

    /// The underlying HTTP client, shared with image downloads
    pub fn http(&self) -> &Client {
        &self.http
    }

    fn get(&self, params: &[(String, String)]) -> Result<Value> {
        let response = self
            .http
            .get(&self.api_url)
            .query(params)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Run a query, following continuations and merging every response
    pub fn query_all(&self, params: &[(&str, &str)]) -> Result<QueryResponse> {
        let base: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut merged = QueryResponse::default();
        let mut request = base.clone();

        for continues in 1..=MAX_CONTINUES {
            let body = self.get(&request)?;
            let response: QueryResponse = serde_json::from_value(body).map_err(banner_core::Error::Json)?;
            response.check()?;

            let next = response.continue_params();
            debug!(request = continues, pages = response.page_count(), "query page");
            merged.merge_additive(response);

            match next {
                Some(cont) => {
                    request = base.clone();
                    request.extend(cont);
                }
                None => return Ok(merged),
            }
        }

        warn!(limit = MAX_CONTINUES, "continuation limit reached, result may be partial");
        Ok(merged)
    }

    /// Every member page of a category, optionally with its categories
    pub fn category_members(&self, category: &str, with_categories: bool) -> Result<PageCollection> {
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("generator", "categorymembers"),
            ("gcmtitle", category),
            ("gcmlimit", "max"),
        ];
        if with_categories {
            params.push(("prop", "categories"));
            params.push(("cllimit", "max"));
        }

        let pages = self.query_all(&params)?.into_pages();
        info!(category, pages = pages.len(), "fetched category members");
        Ok(pages)
    }

    /// Raw wikitext of a page
    pub fn fetch_page_content(&self, page_id: i64) -> Result<String> {
        let id = page_id.to_string();
        let params: Vec<(String, String)> = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("pageids", id.as_str()),
            ("prop", "revisions"),
            ("rvprop", "content"),
            ("rvslots", "main"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let body = self.get(&params)?;
        Ok(extract_content(&body)?)
    }
}

impl ContentFetcher for WikiClient {
    fn fetch_content(&self, page_id: i64) -> banner_core::Result<String> {
        debug!(page_id, "fetching page content");
        self.fetch_page_content(page_id)
            .map_err(|e| banner_core::Error::ContentFetch {
                page_id,
                message: e.to_string(),
            })
    }
}
