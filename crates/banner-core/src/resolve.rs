//! Version resolution for banner pages
//!
//! A page's release version comes from one of three places, tried in order:
//! 1. a single "released in version" category
//! 2. a trailing title segment shaped like `4.2`
//! 3. a `{{Change History|4.2}}` marker in the full page content
//!
//! The third tier needs a network fetch, so content is cached per page id for
//! the lifetime of the resolver.

use crate::error::{Error, Result};
use crate::page::{
    banner_date, event_kind, is_banner_page, last_title_segment, page_has_feature, EventKind,
    Page, PageCollection, TitlePattern,
};
use crate::profile::WikiProfile;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static BARE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("Invalid version regex"));

static CHANGE_HISTORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{Change History\|(\d+\.\d+)\}\}").expect("Invalid change history regex")
});

/// Source of full page content (wikitext)
pub trait ContentFetcher {
    /// Fetch the raw content of a page
    fn fetch_content(&self, page_id: i64) -> Result<String>;
}

impl<F> ContentFetcher for F
where
    F: Fn(i64) -> Result<String>,
{
    fn fetch_content(&self, page_id: i64) -> Result<String> {
        self(page_id)
    }
}

/// Fetcher for runs without network access; every fetch fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl ContentFetcher for OfflineFetcher {
    fn fetch_content(&self, page_id: i64) -> Result<String> {
        Err(Error::ContentFetch {
            page_id,
            message: "offline".to_string(),
        })
    }
}

/// Page content cached for one run
#[derive(Debug, Default)]
pub struct PageContentCache {
    entries: HashMap<i64, String>,
    fetches: usize,
}

impl PageContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached content, fetching it on first use
    ///
    /// A failed fetch is cached as empty content.
    pub fn get_or_fetch<F: ContentFetcher>(&mut self, page_id: i64, fetcher: &F) -> &str {
        if self.entries.contains_key(&page_id) {
            debug!(page_id, "page content cache hit");
        } else {
            self.fetches += 1;
            let content = match fetcher.fetch_content(page_id) {
                Ok(content) => content,
                Err(e) => {
                    warn!(page_id, error = %e, "failed to fetch page content");
                    String::new()
                }
            };
            self.entries.insert(page_id, content);
        }

        self.entries.get(&page_id).map(String::as_str).unwrap_or("")
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fetches issued (cache misses)
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

/// A banner page with its version and kind already worked out
#[derive(Debug, Clone, PartialEq)]
pub struct BannerPage {
    pub page: Page,
    /// Release version, e.g. "4.2" or "Luna I"
    pub version: String,
    pub kind: EventKind,
}

impl BannerPage {
    /// Raw trailing title segment
    pub fn date(&self) -> &str {
        banner_date(&self.page)
    }
}

/// Banner pages whose version resolved, in collection order
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPages {
    pages: Vec<BannerPage>,
    features_prefix: String,
}

impl ClassifiedPages {
    pub fn new(pages: Vec<BannerPage>, features_prefix: impl Into<String>) -> Self {
        Self {
            pages,
            features_prefix: features_prefix.into(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BannerPage> {
        self.pages.iter()
    }

    /// Check whether a banner page features a subject
    pub fn features(&self, page: &BannerPage, subject: &str) -> bool {
        page_has_feature(&page.page, subject, &self.features_prefix)
    }

    /// Pages featuring a subject, in collection order
    pub fn featuring<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a BannerPage> {
        self.pages.iter().filter(move |p| self.features(p, subject))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Resolves page versions for one run
pub struct VersionResolver<F: ContentFetcher> {
    version_prefix: String,
    features_prefix: String,
    weapon_pattern: TitlePattern,
    fetcher: F,
    cache: PageContentCache,
}

impl<F: ContentFetcher> VersionResolver<F> {
    /// Create a resolver with an empty cache
    pub fn new(profile: &WikiProfile, fetcher: F) -> Result<Self> {
        Ok(Self {
            version_prefix: profile.version_prefix.clone(),
            features_prefix: profile.features_prefix.clone(),
            weapon_pattern: profile.weapon_pattern()?,
            fetcher,
            cache: PageContentCache::new(),
        })
    }

    /// The content cache for this run
    pub fn cache(&self) -> &PageContentCache {
        &self.cache
    }

    /// Determine the release version of a page
    pub fn resolve_version(&mut self, page: &Page) -> Result<String> {
        let versions: Vec<&str> = page
            .categories
            .iter()
            .filter_map(|c| c.strip_prefix(self.version_prefix.as_str()))
            .collect();

        if let [version] = versions.as_slice() {
            return Ok(version.to_string());
        }

        let segment = last_title_segment(page);
        if BARE_VERSION.is_match(segment) {
            debug!(title = %page.title, version = segment, "version taken from title");
            return Ok(segment.to_string());
        }

        let content = self.cache.get_or_fetch(page.id, &self.fetcher);
        if let Some(caps) = CHANGE_HISTORY.captures(content) {
            debug!(title = %page.title, version = &caps[1], "version taken from page content");
            return Ok(caps[1].to_string());
        }

        Err(Error::VersionUnresolved {
            title: page.title.clone(),
        })
    }

    /// Keep only banner pages with a resolvable version
    pub fn filter_resolvable_pages(&mut self, pages: &PageCollection) -> ClassifiedPages {
        let mut result = Vec::new();

        for page in pages.iter() {
            if !is_banner_page(page) {
                continue;
            }

            match self.resolve_version(page) {
                Ok(version) => result.push(BannerPage {
                    page: page.clone(),
                    version,
                    kind: event_kind(page, &self.weapon_pattern),
                }),
                Err(e) => {
                    info!(title = %page.title, reason = %e, "skipping page due to version error");
                }
            }
        }

        debug!(
            kept = result.len(),
            total = pages.len(),
            fetches = self.cache.fetch_count(),
            "filtered banner pages"
        );

        ClassifiedPages::new(result, self.features_prefix.clone())
    }
}
