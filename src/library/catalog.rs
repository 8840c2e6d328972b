//! Persisted catalogs for an organized course.
//!
//! Two artifacts are written per course:
//!
//! - `organized_<slug>_<millis>.json`: the playable catalog (videos only)
//! - `pdfs_<slug>.json`: the harvested PDF catalog, keyed by unit id

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use super::download::safe_component;
use crate::content::{OrganizedCourse, PdfCatalog};

/// Playback URL template; `{source_id}` is replaced by the video's media id
pub const DEFAULT_PLAYBACK_TEMPLATE: &str = "https://fast.wistia.com/embed/medias/{source_id}.m3u8";

/// Fill a playback URL template
pub fn playback_url(template: &str, source_id: &str) -> String {
    template.replace("{source_id}", source_id)
}

/// A video ready to play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableVideo {
    pub title: String,
    pub url: String,
}

/// Videos of one course in id order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayableCatalog {
    pub course_slug: String,
    pub course_title: String,
    pub videos: Vec<PlayableVideo>,
    pub total_videos: usize,
}

impl PlayableCatalog {
    /// Build from an organized course
    pub fn from_course(course: &OrganizedCourse, url_template: &str) -> Self {
        let videos: Vec<_> = course
            .videos
            .iter()
            .map(|video| PlayableVideo {
                title: video.title.clone(),
                url: playback_url(url_template, video.source_id()),
            })
            .collect();

        Self {
            course_slug: course.course_slug.clone(),
            course_title: course.course_title.clone(),
            total_videos: videos.len(),
            videos,
        }
    }

    /// Artifact file name for a catalog written at `at`
    pub fn file_name(slug: &str, at: DateTime<Utc>) -> String {
        format!("organized_{}_{}.json", safe_component(slug), at.timestamp_millis())
    }

    /// Write the catalog into `dir`
    pub async fn save(&self, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
        let path = dir.join(Self::file_name(&self.course_slug, at));
        write_json(&path, self).await?;
        info!("Organized content (videos only) saved to: {}", path.display());
        Ok(path)
    }

    /// Read a catalog written by [`PlayableCatalog::save`]
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse catalog JSON")
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// File name of the PDF catalog for a course
pub fn pdf_catalog_file_name(slug: &str) -> String {
    format!("pdfs_{}.json", safe_component(slug))
}

/// Write the harvested PDF catalog into `dir`
pub async fn save_pdf_catalog(catalog: &PdfCatalog, dir: &Path, slug: &str) -> Result<PathBuf> {
    let path = dir.join(pdf_catalog_file_name(slug));
    write_json(&path, catalog).await?;
    info!("PDF catalog ({} entries) saved to: {}", catalog.len(), path.display());
    Ok(path)
}

pub(crate) async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
