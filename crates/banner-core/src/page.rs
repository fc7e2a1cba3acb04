//! Wiki pages and the classifier that decides what a page represents

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;

/// Separator between a subject-group name and the trailing segment of a title
pub const TITLE_SEPARATOR: char = '/';

/// A single wiki article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Wiki page id (negated for synthetic weapon clones)
    pub id: i64,
    /// Page title, e.g. "Epitome Invocation/2021-01-12"
    pub title: String,
    /// Full category titles, e.g. "Category:Features Albedo"
    pub categories: Vec<String>,
}

impl Page {
    /// Create a new page
    pub fn new(id: i64, title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            categories,
        }
    }
}

/// Pages keyed by id
///
/// Iteration is in ascending id order so every run walks pages identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCollection {
    pages: BTreeMap<i64, Page>,
}

impl PageCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page, replacing any page with the same id
    pub fn insert(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.id, page)
    }

    /// Iterate pages in collection order
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// All page titles in collection order
    pub fn titles(&self) -> Vec<&str> {
        self.pages.values().map(|p| p.title.as_str()).collect()
    }

    /// Check whether any page has this exact title
    pub fn contains_title(&self, title: &str) -> bool {
        self.pages.values().any(|p| p.title == title)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<Page> for PageCollection {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        let mut collection = PageCollection::new();
        for page in iter {
            collection.insert(page);
        }
        collection
    }
}

/// The two kinds of banner an event page can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Character,
    Weapon,
}

/// How weapon banner titles are recognised
#[derive(Debug, Clone)]
pub enum TitlePattern {
    /// Title starts with a literal string
    Prefix(String),
    /// Title contains a match of a regex anywhere
    Regex(Regex),
}

impl TitlePattern {
    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(TitlePattern::Regex)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Check a title against the pattern
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitlePattern::Prefix(prefix) => title.starts_with(prefix.as_str()),
            TitlePattern::Regex(re) => re.is_match(title),
        }
    }
}

/// Check if a page represents a banner (has a trailing title segment)
pub fn is_banner_page(page: &Page) -> bool {
    page.title.contains(TITLE_SEPARATOR)
}

/// The title segment after the separator, which is usually a date
///
/// Returns an empty string for non-banner pages.
pub fn banner_date(page: &Page) -> &str {
    page.title
        .split_once(TITLE_SEPARATOR)
        .map(|(_, rest)| rest)
        .unwrap_or("")
}

/// The title segment after the last separator
pub fn last_title_segment(page: &Page) -> &str {
    page.title
        .rsplit_once(TITLE_SEPARATOR)
        .map(|(_, rest)| rest)
        .unwrap_or("")
}

/// Check if a page is a weapon banner
pub fn is_weapon_page(page: &Page, pattern: &TitlePattern) -> bool {
    pattern.matches(&page.title)
}

/// Classify a page into an event kind
pub fn event_kind(page: &Page, pattern: &TitlePattern) -> EventKind {
    if is_weapon_page(page, pattern) {
        EventKind::Weapon
    } else {
        EventKind::Character
    }
}

/// Check if a page is tagged as featuring a subject
pub fn page_has_feature(page: &Page, subject: &str, features_prefix: &str) -> bool {
    page.categories.iter().any(|c| {
        c.strip_prefix(features_prefix)
            .is_some_and(|featured| featured == subject)
    })
}

/// Return the input if it is a real `YYYY-MM-DD` date, otherwise an empty string
pub fn valid_date_or_blank(s: &str) -> &str {
    let shaped = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });

    if shaped && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        s
    } else {
        ""
    }
}
