//! banner-core: Core library for reconstructing wiki banner histories
//!
//! This library provides functionality to:
//! - Classify wiki pages as character or weapon banners
//! - Resolve each banner's release version, falling back to page content
//! - Rebuild per-subject timelines with positional minor versions and
//!   inferred date ranges
//! - Merge pooled events into the regular event pages
//! - Write minified JSON or YAML snapshots with a size floor

pub mod dataset;
pub mod error;
pub mod history;
pub mod naming;
pub mod output;
pub mod page;
pub mod profile;
pub mod query;
pub mod resolve;
pub mod timeline;
pub mod version;

pub use dataset::{assemble_dataset, merge_pooled_events, Rosters};
pub use error::{Error, Result};
pub use history::{BannerDataset, BannerDates, BannerHistory, Bucket};
pub use naming::{filename, rescale_image_url};
pub use output::{serialize_dataset, to_minified_json, to_yaml, write_dataset, OutputFormat};
pub use page::{
    banner_date, event_kind, is_banner_page, is_weapon_page, page_has_feature,
    valid_date_or_blank, EventKind, Page, PageCollection, TitlePattern,
};
pub use profile::{ImageConfig, PoolConfig, RosterCategories, WeaponTitle, WikiProfile};
pub use query::{extract_content, QueryResponse, MAX_CONTINUES};
pub use resolve::{
    BannerPage, ClassifiedPages, ContentFetcher, OfflineFetcher, PageContentCache, VersionResolver,
};
pub use timeline::{
    featured_banner_history, featured_dates, featured_versions, minor_version, next_banner_date,
    specialization_title,
};
pub use version::{compare_versions, sort_versions, to_ordinal, VersionOrdinal};
