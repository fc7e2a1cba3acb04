//! Per-wiki configuration
//!
//! Each supported wiki names its categories and banner titles differently.
//! A profile captures those differences so one reconciliation engine serves
//! every wiki.

use crate::error::{Error, Result};
use crate::page::TitlePattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Everything that differs between wikis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiProfile {
    /// Short name used in logs
    pub name: String,
    /// MediaWiki API endpoint
    pub api_url: String,
    /// Category prefix carrying the release version
    pub version_prefix: String,
    /// Category prefix marking a featured subject
    pub features_prefix: String,
    /// How weapon banner titles are recognised
    pub weapon_title: WeaponTitle,
    /// Category listing every event banner page
    pub event_category: String,
    /// Categories listing the four subject rosters
    pub rosters: RosterCategories,
    /// Secondary source of pooled events, if the wiki has one
    #[serde(default)]
    pub pool: Option<PoolConfig>,
    /// Image download settings
    pub images: ImageConfig,
    /// Display-name rewrites applied after specialization renaming
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Weapon title matcher as written in a profile file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponTitle {
    Prefix(String),
    Regex(String),
}

/// Roster category names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCategories {
    pub five_star_characters: String,
    pub four_star_characters: String,
    pub five_star_weapons: String,
    pub four_star_weapons: String,
}

/// Pooled event source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Category listing every pooled event page
    pub category: String,
    /// Category prefix naming each subject in the pool
    pub prefix: String,
    /// Title prefix given to the weapon interpretation of a pooled page
    pub weapon_title_prefix: String,
}

/// Image download settings
///
/// URL templates use `{name}` and `{size}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub character_url: String,
    pub weapon_url: String,
    pub character_dir: String,
    pub weapon_dir: String,
    #[serde(default = "default_image_size")]
    pub size: u32,
}

fn default_image_size() -> u32 {
    80
}

impl ImageConfig {
    /// Fill a URL template for a subject
    pub fn url_for(template: &str, name: &str, size: u32) -> String {
        template
            .replace("{name}", name)
            .replace("{size}", &size.to_string())
    }
}

impl WikiProfile {
    /// Genshin Impact wiki
    pub fn genshin() -> Self {
        let base = "https://genshin-impact.fandom.com";
        Self {
            name: "genshin".to_string(),
            api_url: format!("{base}/api.php"),
            version_prefix: "Category:Released in Version ".to_string(),
            features_prefix: "Category:Features ".to_string(),
            weapon_title: WeaponTitle::Prefix("Epitome Invocation".to_string()),
            event_category: "Category:Event_Wishes".to_string(),
            rosters: RosterCategories {
                five_star_characters: "Category:5-Star_Characters".to_string(),
                four_star_characters: "Category:4-Star_Characters".to_string(),
                five_star_weapons: "Category:5-Star_Weapons".to_string(),
                four_star_weapons: "Category:4-Star_Weapons".to_string(),
            },
            pool: Some(PoolConfig {
                category: "Category:Chronicled_Wishes".to_string(),
                prefix: "Category:Wish Pool Includes ".to_string(),
                weapon_title_prefix: "Epitome Invocation".to_string(),
            }),
            images: ImageConfig {
                character_url: format!(
                    "{base}/index.php?title=Special:Redirect/file/{{name}} Icon.png&width={{size}}&height={{size}}"
                ),
                weapon_url: format!(
                    "{base}/index.php?title=Special:Redirect/file/Weapon {{name}}.png&width={{size}}&height={{size}}"
                ),
                character_dir: "characters".to_string(),
                weapon_dir: "weapons".to_string(),
                size: default_image_size(),
            },
            aliases: BTreeMap::new(),
        }
    }

    /// Honkai: Star Rail wiki
    pub fn star_rail() -> Self {
        let base = "https://honkai-star-rail.fandom.com";
        let mut aliases = BTreeMap::new();
        aliases.insert("Topaz & Numby".to_string(), "Topaz and Numby".to_string());

        Self {
            name: "star-rail".to_string(),
            api_url: format!("{base}/api.php"),
            version_prefix: "Category:Released in Version ".to_string(),
            features_prefix: "Category:Features ".to_string(),
            weapon_title: WeaponTitle::Regex(
                "(Brilliant.Fixation|Bygone.Reminiscence)".to_string(),
            ),
            event_category: "Category:Event_Warps".to_string(),
            rosters: RosterCategories {
                five_star_characters: "Category:5-Star_Characters".to_string(),
                four_star_characters: "Category:4-Star_Characters".to_string(),
                five_star_weapons: "Category:5-Star_Light_Cones".to_string(),
                four_star_weapons: "Category:4-Star_Light_Cones".to_string(),
            },
            pool: None,
            images: ImageConfig {
                character_url: format!(
                    "{base}/index.php?title=Special:Redirect/file/Character {{name}} Icon.png&width={{size}}&height={{size}}"
                ),
                weapon_url: format!(
                    "{base}/index.php?title=Special:Redirect/file/Light Cone {{name}} Icon.png&width={{size}}&height={{size}}"
                ),
                character_dir: "hsr-characters".to_string(),
                weapon_dir: "lightcones".to_string(),
                size: default_image_size(),
            },
            aliases,
        }
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "genshin" => Some(Self::genshin()),
            "star-rail" | "hsr" => Some(Self::star_rail()),
            _ => None,
        }
    }

    /// Compile the weapon title matcher
    pub fn weapon_pattern(&self) -> Result<TitlePattern> {
        match &self.weapon_title {
            WeaponTitle::Prefix(prefix) => Ok(TitlePattern::Prefix(prefix.clone())),
            WeaponTitle::Regex(pattern) => TitlePattern::regex(pattern),
        }
    }

    /// Load a profile from a YAML or JSON file (by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(Error::Json)
        } else {
            serde_yaml::from_str(&content).map_err(Error::Yaml)
        }
    }

    /// Save the profile as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(WikiProfile::builtin("genshin").unwrap().name, "genshin");
        assert_eq!(WikiProfile::builtin("hsr").unwrap().name, "star-rail");
        assert!(WikiProfile::builtin("unknown").is_none());
    }

    #[test]
    fn test_weapon_patterns_compile() {
        let genshin = WikiProfile::genshin().weapon_pattern().unwrap();
        assert!(genshin.matches("Epitome Invocation/2020-09-28"));

        let star_rail = WikiProfile::star_rail().weapon_pattern().unwrap();
        assert!(star_rail.matches("Brilliant Fixation/2023-04-26"));
        assert!(!star_rail.matches("Butterfly on Swordtip/2023-04-26"));
    }

    #[test]
    fn test_image_url_template() {
        let profile = WikiProfile::genshin();
        let url = ImageConfig::url_for(&profile.images.weapon_url, "Aqua Simulacra", 80);
        assert!(url.ends_with("file/Weapon Aqua Simulacra.png&width=80&height=80"));
    }

    #[test]
    fn test_profile_yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");

        let profile = WikiProfile::star_rail();
        profile.save(&path).unwrap();

        let loaded = WikiProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_profile_load_json_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let json = r#"{
            "name": "custom",
            "api_url": "https://example.org/api.php",
            "version_prefix": "Category:Version ",
            "features_prefix": "Category:Features ",
            "weapon_title": { "prefix": "Weapon Banner" },
            "event_category": "Category:Banners",
            "rosters": {
                "five_star_characters": "a",
                "four_star_characters": "b",
                "five_star_weapons": "c",
                "four_star_weapons": "d"
            },
            "images": {
                "character_url": "{name}",
                "weapon_url": "{name}",
                "character_dir": "c",
                "weapon_dir": "w"
            }
        }"#;
        fs::write(&path, json).unwrap();

        let loaded = WikiProfile::load(&path).unwrap();
        assert!(loaded.pool.is_none());
        assert!(loaded.aliases.is_empty());
        assert_eq!(loaded.images.size, 80);
        assert_eq!(loaded.weapon_title, WeaponTitle::Prefix("Weapon Banner".to_string()));
    }
}
