//! MediaWiki query responses
//!
//! Category queries are paginated. A later page may repeat a page id with
//! more of its categories (`prop=categories` is continued separately), so
//! responses are merged additively.

use crate::error::{Error, Result};
use crate::page::{Page, PageCollection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Upper bound on continuation requests for one query
pub const MAX_CONTINUES: usize = 100;

/// One response of `action=query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Continuation parameters for the next request
    #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Value>,
}

/// The `query` object of a response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    /// Pages keyed by id (as returned with `formatversion=1`)
    #[serde(default)]
    pub pages: BTreeMap<String, RawPage>,
}

/// A page as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub pageid: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    pub title: String,
}

impl QueryResponse {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(Error::Json)
    }

    /// Fail if the API reported an error; log warnings
    pub fn check(&self) -> Result<()> {
        if let Some(error) = self.error.as_ref().or(self.errors.as_ref()) {
            return Err(Error::Api(error.to_string()));
        }
        if let Some(warnings) = &self.warnings {
            warn!(%warnings, "API warnings");
        }
        Ok(())
    }

    /// Continuation parameters as strings, if there is another page
    pub fn continue_params(&self) -> Option<Vec<(String, String)>> {
        self.continuation.as_ref().map(|c| {
            c.iter()
                .map(|(k, v)| {
                    let value = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), value)
                })
                .collect()
        })
    }

    /// Fold a later response into this one
    ///
    /// New pages are added; categories of a page seen before are appended.
    pub fn merge_additive(&mut self, other: QueryResponse) {
        let Some(other_query) = other.query else {
            return;
        };

        let query = self.query.get_or_insert_with(Query::default);
        for (key, page) in other_query.pages {
            match query.pages.get_mut(&key) {
                Some(existing) => existing.categories.extend(page.categories),
                None => {
                    query.pages.insert(key, page);
                }
            }
        }
    }

    /// Number of pages in the response
    pub fn page_count(&self) -> usize {
        self.query.as_ref().map(|q| q.pages.len()).unwrap_or(0)
    }

    /// Convert into a page collection
    ///
    /// Pages without an id fall back to their key; pages with neither are dropped.
    pub fn into_pages(self) -> PageCollection {
        let Some(query) = self.query else {
            return PageCollection::new();
        };

        query
            .pages
            .into_iter()
            .filter_map(|(key, raw)| {
                let id = raw.pageid.or_else(|| key.parse().ok())?;
                let categories = raw.categories.into_iter().map(|c| c.title).collect();
                Some(Page::new(id, raw.title, categories))
            })
            .collect()
    }
}

/// Extract the main-slot content of the first revision of the first page
///
/// Handles both `formatversion=1` (pages keyed by id, content under `*`) and
/// `formatversion=2` (pages as an array, content under `content`).
pub fn extract_content(response: &Value) -> Result<String> {
    let malformed = |what: &str| Error::MalformedResponse(format!("page content: {what}"));

    let pages = response
        .pointer("/query/pages")
        .ok_or_else(|| malformed("missing query.pages"))?;

    let page = match pages {
        Value::Array(items) => items.first(),
        Value::Object(map) => map.values().next(),
        _ => None,
    }
    .ok_or_else(|| malformed("no pages"))?;

    let revision = page
        .pointer("/revisions/0")
        .ok_or_else(|| malformed("no revisions"))?;

    let content = revision
        .pointer("/slots/main/content")
        .or_else(|| revision.pointer("/slots/main/*"))
        .or_else(|| revision.get("*"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("no content"))?;

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIRST: &str = r#"{
        "continue": {"clcontinue": "209266|Event_Wishes", "continue": "||"},
        "query": {"pages": {
            "209266": {"pageid": 209266, "ns": 0, "title": "Ballad in Goblets/2020-09-28",
                       "categories": [{"ns": 14, "title": "Category:Features Venti"}]},
            "209270": {"pageid": 209270, "ns": 0, "title": "Epitome Invocation/2020-09-28"}
        }}
    }"#;

    const SECOND: &str = r#"{
        "query": {"pages": {
            "209266": {"pageid": 209266, "ns": 0, "title": "Ballad in Goblets/2020-09-28",
                       "categories": [{"ns": 14, "title": "Category:Released in Version 1.0"}]},
            "209270": {"pageid": 209270, "ns": 0, "title": "Epitome Invocation/2020-09-28",
                       "categories": [{"ns": 14, "title": "Category:Features Skyward Harp"}]}
        }}
    }"#;

    #[test]
    fn test_continue_params() {
        let first = QueryResponse::from_json(FIRST).unwrap();
        let params = first.continue_params().unwrap();
        assert!(params.contains(&("clcontinue".to_string(), "209266|Event_Wishes".to_string())));
        assert!(params.contains(&("continue".to_string(), "||".to_string())));

        let second = QueryResponse::from_json(SECOND).unwrap();
        assert!(second.continue_params().is_none());
    }

    #[test]
    fn test_merge_additive_appends_categories() {
        let mut merged = QueryResponse::from_json(FIRST).unwrap();
        merged.merge_additive(QueryResponse::from_json(SECOND).unwrap());

        assert_eq!(merged.page_count(), 2);

        let pages = merged.into_pages();
        let ballad = pages.iter().find(|p| p.id == 209266).unwrap();
        assert_eq!(
            ballad.categories,
            vec![
                "Category:Features Venti".to_string(),
                "Category:Released in Version 1.0".to_string(),
            ]
        );
        let epitome = pages.iter().find(|p| p.id == 209270).unwrap();
        assert_eq!(epitome.categories, vec!["Category:Features Skyward Harp".to_string()]);
    }

    #[test]
    fn test_check_reports_api_error() {
        let response = QueryResponse::from_json(
            r#"{"error": {"code": "badparam", "info": "bad"}}"#,
        )
        .unwrap();
        assert!(matches!(response.check(), Err(Error::Api(_))));
    }

    #[test]
    fn test_empty_response_has_no_pages() {
        let response = QueryResponse::from_json("{}").unwrap();
        assert!(response.check().is_ok());
        assert!(response.into_pages().is_empty());
    }

    #[test]
    fn test_extract_content_formatversion_2() {
        let body = json!({
            "query": {"pages": [{"pageid": 1, "revisions": [
                {"slots": {"main": {"contentmodel": "wikitext", "content": "{{Change History|1.3}}"}}}
            ]}]}
        });
        assert_eq!(extract_content(&body).unwrap(), "{{Change History|1.3}}");
    }

    #[test]
    fn test_extract_content_formatversion_1() {
        let body = json!({
            "query": {"pages": {"1": {"pageid": 1, "revisions": [
                {"slots": {"main": {"*": "legacy content"}}}
            ]}}}
        });
        assert_eq!(extract_content(&body).unwrap(), "legacy content");
    }

    #[test]
    fn test_extract_content_missing_revision() {
        let body = json!({"query": {"pages": [{"pageid": 1, "missing": true}]}});
        assert!(matches!(
            extract_content(&body),
            Err(Error::MalformedResponse(_))
        ));
    }
}
