//! One-call organization of a fetched course document.

use std::collections::BTreeMap;

use serde_json::Value;

use super::harvest::{harvest_pdfs, PdfCatalog};
use super::resolver::{ContentEntry, LearningPathResolver, ResolveStats, DEFAULT_VIDEO_TYPE};
use crate::diagnostics::Diagnostics;
use crate::document::{course_body, Fields};

/// Everything extracted from one course document
#[derive(Debug, Clone)]
pub struct OrganizedCourse {
    pub course_slug: String,
    /// Course title, or the slug when the document has none
    pub course_title: String,
    /// Videos in id order
    pub videos: Vec<ContentEntry>,
    /// PDFs reached through learning paths, in id order
    pub pdfs: Vec<ContentEntry>,
    /// PDFs found anywhere in the document; the persisted list
    pub harvested_pdfs: PdfCatalog,
    pub stats: ResolveStats,
    /// Unit count per kind in the index after resolution
    pub unit_kinds: BTreeMap<String, usize>,
    pub diagnostics: Diagnostics,
}

/// Options for [`organize_course`]
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub default_video_type: String,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            default_video_type: DEFAULT_VIDEO_TYPE.to_string(),
        }
    }
}

/// Resolve learning paths and harvest PDFs from a course response.
///
/// `document` may be the bare course object or wrapped in `{"course": ...}`.
pub fn organize_course(document: &Value, course_slug: &str, options: &OrganizeOptions) -> OrganizedCourse {
    let course = course_body(document);

    let resolved = LearningPathResolver::for_course(course)
        .with_default_video_type(options.default_video_type.clone())
        .resolve();
    let harvest = harvest_pdfs(course);

    let mut diagnostics = resolved.diagnostics;
    diagnostics.extend(harvest.diagnostics);

    OrganizedCourse {
        course_slug: course_slug.to_string(),
        course_title: course.text("title").unwrap_or_else(|| course_slug.to_string()),
        videos: resolved.videos,
        pdfs: resolved.pdfs,
        harvested_pdfs: harvest.catalog,
        stats: resolved.stats,
        unit_kinds: resolved.unit_kinds,
        diagnostics,
    }
}
