//! Timeline reconciliation
//!
//! Rebuilds, for each subject, the ordered list of banner appearances from
//! the flat set of classified banner pages. Minor versions are positional:
//! the Nth distinct release date within a version is minor N. End dates are
//! inferred from the next later banner of the same kind.
//!
//! Versions and dates are de-duplicated separately, so their lengths can
//! drift apart on some real wiki data: two undated pages with different
//! title versions give two versions but one blank date range, and a subject
//! featured on two dates of the same version gets the same minor twice.
//! `featured_banner_history` treats such a drift as fatal.

use crate::history::{BannerDates, BannerHistory};
use crate::page::{valid_date_or_blank, EventKind, PageCollection, TITLE_SEPARATOR};
use crate::resolve::{BannerPage, ClassifiedPages};
use crate::version::{compare_versions, sort_versions};
use std::collections::BTreeMap;
use tracing::debug;

/// Sort key that orders undated pages after dated ones
const UNDATED_KEY: &str = "9999-99-99";

/// Sort key that orders blank start dates last
const BLANK_START_KEY: &str = "999999999";

fn date_key(page: &BannerPage) -> &str {
    match valid_date_or_blank(page.date()) {
        "" => UNDATED_KEY,
        date => date,
    }
}

/// Position of the subject's release window within a version
///
/// Counts distinct dates among pages of `version` and `kind`, in date order,
/// up to and including the first page featuring the subject.
pub fn minor_version(pages: &ClassifiedPages, version: &str, kind: EventKind, subject: &str) -> u32 {
    let mut of_version: Vec<&BannerPage> = pages
        .iter()
        .filter(|p| p.kind == kind && p.version == version)
        .collect();
    of_version.sort_by(|a, b| date_key(a).cmp(date_key(b)));

    let mut minor = 0;
    let mut previous = "";

    for page in of_version {
        if page.date() != previous {
            previous = page.date();
            minor += 1;
        }

        if pages.features(page, subject) {
            break;
        }
    }

    minor
}

/// Every "major.minor" version a subject was featured in, in ordinal order
pub fn featured_versions(pages: &ClassifiedPages, subject: &str) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for page in pages.featuring(subject) {
        let minor = minor_version(pages, &page.version, page.kind, subject);
        let full = format!("{}.{}", page.version, minor);
        if !result.contains(&full) {
            result.push(full);
        }
    }

    sort_versions(&mut result);
    result
}

/// The earliest valid banner date after `start` among banners of `kind`
///
/// Returns an empty string when no later banner exists.
pub fn next_banner_date(pages: &ClassifiedPages, start: &str, kind: EventKind) -> String {
    pages
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| valid_date_or_blank(p.date()))
        .filter(|date| !date.is_empty() && *date > start)
        .min()
        .unwrap_or("")
        .to_string()
}

/// Date ranges of every banner featuring a subject, ordered by start date
pub fn featured_dates(pages: &ClassifiedPages, subject: &str) -> Vec<BannerDates> {
    let mut result: Vec<BannerDates> = Vec::new();

    for page in pages.featuring(subject) {
        let start = valid_date_or_blank(page.date());
        let end = if start.is_empty() {
            String::new()
        } else {
            next_banner_date(pages, start, page.kind)
        };

        let dates = BannerDates::new(start, end);
        if !result.contains(&dates) {
            result.push(dates);
        }
    }

    result.sort_by(|a, b| start_key(a).cmp(start_key(b)));
    result
}

fn start_key(dates: &BannerDates) -> &str {
    if dates.start.is_empty() {
        BLANK_START_KEY
    } else {
        &dates.start
    }
}

/// Display name of a roster page
///
/// Specialization sub-pages ("Base/Variant") become "Base (Variant)", then
/// any alias for the result is applied.
pub fn specialization_title(title: &str, aliases: &BTreeMap<String, String>) -> String {
    let name = match title.split_once(TITLE_SEPARATOR) {
        Some((base, variant)) => {
            let variant = variant.split(TITLE_SEPARATOR).next().unwrap_or(variant);
            format!("{} ({})", base, variant)
        }
        None => title.to_string(),
    };

    aliases.get(&name).cloned().unwrap_or(name)
}

/// Banner histories for every subject of a roster that was ever featured
///
/// Roster titles are walked in case-insensitive order. Histories are then
/// ordered by debut version; ties keep that title order.
///
/// # Panics
///
/// Panics when a subject ends up with a different number of versions and
/// date ranges.
pub fn featured_banner_history(
    pages: &ClassifiedPages,
    roster: &PageCollection,
    aliases: &BTreeMap<String, String>,
) -> Vec<BannerHistory> {
    let mut titles = roster.titles();
    titles.sort_by_cached_key(|t| (t.to_lowercase(), t.to_string()));

    let mut result: Vec<BannerHistory> = Vec::new();
    for title in titles {
        let name = specialization_title(title, aliases);
        let versions = featured_versions(pages, &name);
        let dates = featured_dates(pages, &name);

        assert_eq!(
            versions.len(),
            dates.len(),
            "version and dates length mismatch for {name}: versions {versions:?}, dates {dates:?}"
        );

        if versions.is_empty() {
            debug!(subject = %name, "never featured, skipping");
            continue;
        }

        result.push(BannerHistory {
            name,
            versions,
            dates,
        });
    }

    result.sort_by(|a, b| compare_versions(a.debut().unwrap_or(""), b.debut().unwrap_or("")));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    const FEATURES: &str = "Category:Features ";

    fn banner(id: i64, title: &str, version: &str, kind: EventKind, featured: &[&str]) -> BannerPage {
        let categories = featured.iter().map(|f| format!("{FEATURES}{f}")).collect();
        BannerPage {
            page: Page::new(id, title, categories),
            version: version.to_string(),
            kind,
        }
    }

    fn classified(pages: Vec<BannerPage>) -> ClassifiedPages {
        ClassifiedPages::new(pages, FEATURES)
    }

    fn sample() -> ClassifiedPages {
        use EventKind::*;
        classified(vec![
            banner(1, "Ballad in Goblets/2020-09-28", "1.0", Character, &["Venti", "Xiangling"]),
            banner(2, "Sparkling Steps/2020-10-20", "1.0", Character, &["Klee", "Xingqiu"]),
            banner(3, "Farewell of Snezhnaya/2020-11-11", "1.1", Character, &["Tartaglia", "Diona"]),
            banner(4, "Gentry of Hermitage/2020-12-01", "1.1", Character, &["Zhongli", "Xingqiu"]),
            banner(5, "Epitome Invocation/2020-09-28", "1.0", Weapon, &["Skyward Harp"]),
            banner(6, "Epitome Invocation/2020-10-20", "1.0", Weapon, &["Lost Prayer"]),
            banner(7, "Ballad in Goblets/2021-03-17", "1.4", Character, &["Venti"]),
            banner(8, "Invitation to Mundane Life/Rerun", "1.4", Character, &["Xinyan", "Xiangling"]),
        ])
    }

    #[test]
    fn test_minor_version_counts_distinct_dates() {
        let pages = sample();
        assert_eq!(minor_version(&pages, "1.0", EventKind::Character, "Venti"), 1);
        assert_eq!(minor_version(&pages, "1.0", EventKind::Character, "Klee"), 2);
        assert_eq!(minor_version(&pages, "1.1", EventKind::Character, "Zhongli"), 2);
        assert_eq!(minor_version(&pages, "1.0", EventKind::Weapon, "Lost Prayer"), 2);
    }

    #[test]
    fn test_minor_version_shared_date_counts_once() {
        use EventKind::*;
        let pages = classified(vec![
            banner(1, "A/2021-01-12", "1.2", Character, &["Albedo"]),
            banner(2, "B/2021-01-12", "1.2", Character, &["Ganyu"]),
            banner(3, "C/2021-02-02", "1.2", Character, &["Xiao"]),
        ]);
        assert_eq!(minor_version(&pages, "1.2", Character, "Ganyu"), 1);
        assert_eq!(minor_version(&pages, "1.2", Character, "Xiao"), 2);
    }

    #[test]
    fn test_minor_version_undated_pages_sort_last() {
        use EventKind::*;
        let pages = classified(vec![
            banner(1, "A/Unknown", "2.0", Character, &["Ayaka"]),
            banner(2, "B/2021-07-21", "2.0", Character, &["Yoimiya"]),
        ]);
        assert_eq!(minor_version(&pages, "2.0", Character, "Yoimiya"), 1);
        assert_eq!(minor_version(&pages, "2.0", Character, "Ayaka"), 2);
    }

    #[test]
    fn test_featured_versions_deduplicated_and_sorted() {
        let pages = sample();
        assert_eq!(featured_versions(&pages, "Venti"), vec!["1.0.1", "1.4.1"]);
        assert_eq!(featured_versions(&pages, "Xingqiu"), vec!["1.0.2", "1.1.2"]);
        assert!(featured_versions(&pages, "Diluc").is_empty());
    }

    #[test]
    fn test_next_banner_date_same_kind_only() {
        let pages = sample();
        assert_eq!(next_banner_date(&pages, "2020-09-28", EventKind::Character), "2020-10-20");
        assert_eq!(next_banner_date(&pages, "2020-10-20", EventKind::Weapon), "");
        assert_eq!(next_banner_date(&pages, "2021-03-17", EventKind::Character), "");
    }

    #[test]
    fn test_featured_dates() {
        let pages = sample();
        assert_eq!(
            featured_dates(&pages, "Venti"),
            vec![
                BannerDates::new("2020-09-28", "2020-10-20"),
                BannerDates::new("2021-03-17", ""),
            ]
        );
    }

    #[test]
    fn test_featured_dates_blank_start_goes_last() {
        let pages = sample();
        assert_eq!(featured_versions(&pages, "Xiangling"), vec!["1.0.1", "1.4.2"]);
        assert_eq!(
            featured_dates(&pages, "Xiangling"),
            vec![
                BannerDates::new("2020-09-28", "2020-10-20"),
                BannerDates::new("", ""),
            ]
        );
    }

    #[test]
    fn test_versions_and_dates_have_equal_length() {
        let pages = sample();
        for subject in ["Venti", "Klee", "Xingqiu", "Zhongli", "Skyward Harp", "Xinyan", "Xiangling"] {
            assert_eq!(
                featured_versions(&pages, subject).len(),
                featured_dates(&pages, subject).len(),
                "{subject}"
            );
        }
    }

    #[test]
    fn test_specialization_title() {
        let mut aliases = BTreeMap::new();
        assert_eq!(specialization_title("Traveler/Anemo", &aliases), "Traveler (Anemo)");
        assert_eq!(specialization_title("Venti", &aliases), "Venti");

        aliases.insert("Topaz & Numby".to_string(), "Topaz and Numby".to_string());
        assert_eq!(specialization_title("Topaz & Numby", &aliases), "Topaz and Numby");
    }

    #[test]
    fn test_featured_banner_history_orders_by_debut() {
        let pages = sample();
        let roster: PageCollection = vec![
            Page::new(10, "Zhongli", vec![]),
            Page::new(11, "Venti", vec![]),
            Page::new(12, "Diluc", vec![]),
            Page::new(13, "Klee", vec![]),
        ]
        .into_iter()
        .collect();

        let histories = featured_banner_history(&pages, &roster, &BTreeMap::new());
        let names: Vec<&str> = histories.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Venti", "Klee", "Zhongli"]);
        assert_eq!(histories[2].versions, vec!["1.1.2"]);
        assert_eq!(
            histories[2].dates,
            vec![BannerDates::new("2020-12-01", "2021-03-17")]
        );
    }

    #[test]
    fn test_next_banner_date_skips_same_start() {
        use EventKind::*;
        let pages = classified(vec![
            banner(1, "A/2021-01-12", "1.2", Character, &["Albedo"]),
            banner(2, "B/2021-01-12", "1.2", Character, &["Ganyu"]),
            banner(3, "C/2021-02-02", "1.2", Character, &["Xiao"]),
            banner(4, "Epitome Invocation/2021-01-20", "1.2", Weapon, &["Amos' Bow"]),
        ]);
        assert_eq!(next_banner_date(&pages, "2021-01-12", Character), "2021-02-02");
        assert_eq!(
            featured_dates(&pages, "Ganyu"),
            vec![BannerDates::new("2021-01-12", "2021-02-02")]
        );
    }

    #[test]
    fn test_featured_banner_history_ties_use_case_insensitive_title_order() {
        use EventKind::*;
        let pages = classified(vec![banner(
            1,
            "Shared Stage/2021-01-12",
            "1.2",
            Character,
            &["Zhongli", "albedo"],
        )]);
        let roster: PageCollection = vec![
            Page::new(10, "Zhongli", vec![]),
            Page::new(11, "albedo", vec![]),
        ]
        .into_iter()
        .collect();

        let histories = featured_banner_history(&pages, &roster, &BTreeMap::new());
        let names: Vec<&str> = histories.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["albedo", "Zhongli"]);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_featured_banner_history_panics_on_undated_title_versions() {
        use EventKind::*;
        let pages = classified(vec![
            banner(1, "Epitome Invocation/4.2", "4.2", Weapon, &["Aqua Simulacra"]),
            banner(2, "Epitome Invocation/4.3", "4.3", Weapon, &["Aqua Simulacra"]),
        ]);
        let roster: PageCollection = vec![Page::new(10, "Aqua Simulacra", vec![])]
            .into_iter()
            .collect();

        featured_banner_history(&pages, &roster, &BTreeMap::new());
    }
}
