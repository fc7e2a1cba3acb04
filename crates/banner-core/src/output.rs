//! Snapshot writers
//!
//! Output is refused when it is smaller than a configured floor, so that a
//! partial upstream fetch cannot overwrite a good snapshot.

use crate::error::{Error, Result};
use crate::history::BannerDataset;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Snapshot format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Minified JSON of subject -> versions
    Json,
    /// Indented YAML with full detail
    #[default]
    Yaml,
}

impl OutputFormat {
    /// Pick a format from a file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!("unknown format '{other}', expected json or yaml")),
        }
    }
}

/// Minified JSON: bucket -> subject name -> versions
pub fn to_minified_json(dataset: &BannerDataset) -> Result<String> {
    let summary: BTreeMap<&str, BTreeMap<&str, &[String]>> = dataset
        .buckets()
        .map(|(bucket, histories)| {
            let subjects: BTreeMap<&str, &[String]> = histories
                .iter()
                .map(|h| (h.name.as_str(), h.versions.as_slice()))
                .collect();
            (bucket.key(), subjects)
        })
        .collect();

    Ok(serde_json::to_string(&summary)?)
}

/// Full dataset as YAML
pub fn to_yaml(dataset: &BannerDataset) -> Result<String> {
    Ok(serde_yaml::to_string(dataset)?)
}

/// Serialize a dataset in the given format
pub fn serialize_dataset(dataset: &BannerDataset, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_minified_json(dataset),
        OutputFormat::Yaml => to_yaml(dataset),
    }
}

/// Write a dataset, refusing output smaller than `min_size` bytes
///
/// Returns the number of bytes written.
pub fn write_dataset<P: AsRef<Path>>(
    dataset: &BannerDataset,
    path: P,
    format: OutputFormat,
    min_size: usize,
) -> Result<usize> {
    let path = path.as_ref();
    let content = serialize_dataset(dataset, format)?;

    if content.len() < min_size {
        return Err(Error::OutputTooSmall {
            size: content.len(),
            min_size,
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, &content)?;
    info!(path = %path.display(), bytes = content.len(), "wrote banner data");
    Ok(content.len())
}
