//! Dataset assembly across the four subject buckets

use crate::history::{BannerDataset, Bucket};
use crate::page::{banner_date, is_banner_page, Page, PageCollection};
use crate::profile::{PoolConfig, WikiProfile};
use crate::resolve::{ContentFetcher, VersionResolver};
use crate::timeline::featured_banner_history;
use std::collections::BTreeMap;
use tracing::info;

/// The four subject rosters
#[derive(Debug, Clone, Default)]
pub struct Rosters {
    pub five_star_characters: PageCollection,
    pub four_star_characters: PageCollection,
    pub five_star_weapons: PageCollection,
    pub four_star_weapons: PageCollection,
}

impl Rosters {
    /// Roster of one bucket
    pub fn bucket(&self, bucket: Bucket) -> &PageCollection {
        match bucket {
            Bucket::FiveStarCharacters => &self.five_star_characters,
            Bucket::FourStarCharacters => &self.four_star_characters,
            Bucket::FiveStarWeapons => &self.five_star_weapons,
            Bucket::FourStarWeapons => &self.four_star_weapons,
        }
    }
}

/// Reconcile every roster against the event pages
///
/// Event pages are filtered once; each bucket is reconciled independently
/// against the same filtered pages.
pub fn assemble_dataset<F: ContentFetcher>(
    resolver: &mut VersionResolver<F>,
    events: &PageCollection,
    rosters: &Rosters,
    aliases: &BTreeMap<String, String>,
) -> BannerDataset {
    let pages = resolver.filter_resolvable_pages(events);
    info!(
        banners = pages.len(),
        events = events.len(),
        "reconciling banner histories"
    );

    let history = |bucket: Bucket| {
        let result = featured_banner_history(&pages, rosters.bucket(bucket), aliases);
        info!(bucket = bucket.key(), subjects = result.len(), "bucket reconciled");
        result
    };

    BannerDataset {
        five_star_characters: history(Bucket::FiveStarCharacters),
        four_star_characters: history(Bucket::FourStarCharacters),
        five_star_weapons: history(Bucket::FiveStarWeapons),
        four_star_weapons: history(Bucket::FourStarWeapons),
    }
}

/// Copy of a pooled page with a features tag for every pooled subject on the roster
fn coerce_pooled_page(page: &Page, pool: &PoolConfig, roster: &PageCollection, features_prefix: &str) -> Page {
    let mut coerced = page.clone();

    let featured: Vec<String> = page
        .categories
        .iter()
        .filter_map(|c| c.strip_prefix(pool.prefix.as_str()))
        .filter(|subject| roster.contains_title(subject))
        .map(|subject| format!("{features_prefix}{subject}"))
        .collect();

    coerced.categories.extend(featured);
    coerced
}

/// Merge pooled event pages into the event pages
///
/// Every pooled banner page is added twice: once as a character banner
/// under its own id, and once as a weapon banner under the negated id with
/// its title rewritten to the weapon banner prefix.
pub fn merge_pooled_events(
    events: &PageCollection,
    pooled: &PageCollection,
    five_star_characters: &PageCollection,
    five_star_weapons: &PageCollection,
    profile: &WikiProfile,
) -> PageCollection {
    let mut merged = events.clone();

    let Some(pool) = &profile.pool else {
        return merged;
    };

    let mut added = 0;
    for page in pooled.iter().filter(|p| is_banner_page(p)) {
        let character = coerce_pooled_page(page, pool, five_star_characters, &profile.features_prefix);

        let mut weapon = coerce_pooled_page(page, pool, five_star_weapons, &profile.features_prefix);
        weapon.id = -page.id;
        weapon.title = format!("{}/{}", pool.weapon_title_prefix, banner_date(page));

        merged.insert(character);
        merged.insert(weapon);
        added += 1;
    }

    info!(pooled = added, total = merged.len(), "merged pooled events");
    merged
}
