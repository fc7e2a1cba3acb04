//! Banner history records produced by reconciliation

use serde::{Deserialize, Serialize};

/// Date range of one banner appearance
///
/// Either field is empty when the date could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerDates {
    pub start: String,
    pub end: String,
}

impl BannerDates {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Every banner appearance of one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerHistory {
    /// Display name of the subject
    pub name: String,
    /// "major.minor" labels in chronological order
    pub versions: Vec<String>,
    /// Date ranges, positionally matching `versions`
    pub dates: Vec<BannerDates>,
}

impl BannerHistory {
    /// The version of the first appearance
    pub fn debut(&self) -> Option<&str> {
        self.versions.first().map(String::as_str)
    }
}

/// Banner histories for the four subject buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDataset {
    pub five_star_characters: Vec<BannerHistory>,
    pub four_star_characters: Vec<BannerHistory>,
    pub five_star_weapons: Vec<BannerHistory>,
    pub four_star_weapons: Vec<BannerHistory>,
}

/// Which of the four buckets a history belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    FiveStarCharacters,
    FourStarCharacters,
    FiveStarWeapons,
    FourStarWeapons,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::FiveStarCharacters,
        Bucket::FourStarCharacters,
        Bucket::FiveStarWeapons,
        Bucket::FourStarWeapons,
    ];

    /// Serialized key of the bucket
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::FiveStarCharacters => "fiveStarCharacters",
            Bucket::FourStarCharacters => "fourStarCharacters",
            Bucket::FiveStarWeapons => "fiveStarWeapons",
            Bucket::FourStarWeapons => "fourStarWeapons",
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Bucket::FiveStarCharacters | Bucket::FourStarCharacters)
    }
}

impl BannerDataset {
    /// Histories of one bucket
    pub fn bucket(&self, bucket: Bucket) -> &[BannerHistory] {
        match bucket {
            Bucket::FiveStarCharacters => &self.five_star_characters,
            Bucket::FourStarCharacters => &self.four_star_characters,
            Bucket::FiveStarWeapons => &self.five_star_weapons,
            Bucket::FourStarWeapons => &self.four_star_weapons,
        }
    }

    /// Iterate (bucket, histories) pairs in serialization order
    pub fn buckets(&self) -> impl Iterator<Item = (Bucket, &[BannerHistory])> {
        Bucket::ALL.into_iter().map(move |b| (b, self.bucket(b)))
    }

    /// Get total number of histories
    pub fn total_entries(&self) -> usize {
        self.buckets().map(|(_, h)| h.len()).sum()
    }
}
