//! Subject icon downloads

use banner_core::{filename, BannerDataset, ImageConfig};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between two downloads
const DOWNLOAD_DELAY: Duration = Duration::from_millis(500);

/// Outcome counts of one download run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Target path of a subject's icon
pub fn image_path(root: &Path, dir: &str, name: &str) -> PathBuf {
    root.join(dir).join(format!("{}.png", filename(name)))
}

/// Download an icon for every subject in the dataset
///
/// Existing files are kept unless `force` is set. Failed downloads and
/// failed writes are logged and do not stop the run.
pub fn download_images(
    http: &Client,
    dataset: &BannerDataset,
    config: &ImageConfig,
    root: &Path,
    force: bool,
) -> DownloadSummary {
    store_images(|url| fetch_image(http, url), dataset, config, root, force)
}

fn store_images<F>(
    fetch: F,
    dataset: &BannerDataset,
    config: &ImageConfig,
    root: &Path,
    force: bool,
) -> DownloadSummary
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    let mut summary = DownloadSummary::default();

    for (bucket, histories) in dataset.buckets() {
        let (template, dir) = if bucket.is_character() {
            (&config.character_url, &config.character_dir)
        } else {
            (&config.weapon_url, &config.weapon_dir)
        };

        for history in histories {
            let path = image_path(root, dir, &history.name);
            if path.exists() && !force {
                debug!(path = %path.display(), "image exists, skipping");
                summary.skipped += 1;
                continue;
            }

            let url = ImageConfig::url_for(template, &history.name, config.size);
            match fetch(&url) {
                Some(bytes) => match write_image(&path, &bytes) {
                    Ok(()) => {
                        debug!(path = %path.display(), "downloaded image");
                        summary.downloaded += 1;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to write image");
                        summary.failed += 1;
                    }
                },
                None => summary.failed += 1,
            }

            thread::sleep(DOWNLOAD_DELAY);
        }
    }

    info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed,
        "image download finished"
    );
    summary
}

fn write_image(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

/// Body of a successful response, or `None` after logging the failure
fn fetch_image(http: &Client, url: &str) -> Option<Vec<u8>> {
    let response = match http.get(url).send() {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "image request failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "image download failed");
        return None;
    }

    match response.bytes() {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            warn!(url, error = %e, "failed to read image body");
            None
        }
    }
}
