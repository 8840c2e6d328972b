//! Learning path resolution.
//!
//! Walks `sections.<key>.learningPath[]` in document order, looks every
//! referenced unit up, and sorts the result into video and PDF entries.
//!
//! Lookup order for a path item id:
//! 1. the [`UnitIndex`];
//! 2. a course-object field with that key carrying an `objectType`;
//! 3. the course's `videos` mapping under that key.
//!
//! Hits from 2 and 3 are added to the index so repeated references resolve
//! directly.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::index::UnitIndex;
use super::unit::{LearningPathItem, UnitKind, UnitRecord};
use crate::diagnostics::{Diagnostics, Issue};
use crate::document::{is_present, Fields};

/// Player type assumed when a video unit does not declare one
pub const DEFAULT_VIDEO_TYPE: &str = "wistia";

/// Title used when neither the unit nor the path item has one
pub const UNTITLED: &str = "Untitled";

/// PDF-specific fields of a content entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDetail {
    pub source_id: String,
    pub pdf_name: String,
    pub pdf_path: String,
    pub course_section: String,
}

/// Video-specific fields of a content entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub source_id: String,
    pub duration: f64,
    pub video_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentDetail {
    Pdf(PdfDetail),
    Video(VideoDetail),
}

/// A resolved learning path entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: String,
    pub title: String,
    /// Section title, or the section key when untitled
    pub section: String,
    pub section_id: String,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    pub order: i64,
    #[serde(flatten)]
    pub detail: ContentDetail,
}

impl ContentEntry {
    pub fn source_id(&self) -> &str {
        match &self.detail {
            ContentDetail::Pdf(pdf) => &pdf.source_id,
            ContentDetail::Video(video) => &video.source_id,
        }
    }
}

/// Counters for one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveStats {
    pub sections: usize,
    pub items: usize,
    pub matched: usize,
    pub missing_identifier: usize,
    pub unresolved: usize,
    /// Resolved units that are neither video nor PDF
    pub other_kinds: usize,
}

/// Output of one resolver pass
#[derive(Debug, Clone, Default)]
pub struct ResolvedContent {
    /// Video entries sorted by id
    pub videos: Vec<ContentEntry>,
    /// PDF entries sorted by id
    pub pdfs: Vec<ContentEntry>,
    pub stats: ResolveStats,
    /// Unit count per kind, including units added by fallback lookups
    pub unit_kinds: BTreeMap<String, usize>,
    pub diagnostics: Diagnostics,
}

/// Section context shared by every item of one learning path
struct SectionContext<'s> {
    key: &'s str,
    label: String,
}

pub struct LearningPathResolver<'a> {
    course: &'a Value,
    index: UnitIndex,
    default_video_type: String,
}

impl<'a> LearningPathResolver<'a> {
    /// Resolve against `course` using a prebuilt index
    pub fn new(course: &'a Value, index: UnitIndex) -> Self {
        Self {
            course,
            index,
            default_video_type: DEFAULT_VIDEO_TYPE.to_string(),
        }
    }

    /// Build the index from `course` and resolve against it
    pub fn for_course(course: &'a Value) -> Self {
        Self::new(course, UnitIndex::build(course))
    }

    pub fn with_default_video_type(mut self, video_type: impl Into<String>) -> Self {
        self.default_video_type = video_type.into();
        self
    }

    /// The index, including units added by fallback lookups
    pub fn index(&self) -> &UnitIndex {
        &self.index
    }

    /// Sections as (key, section) pairs in document order
    fn sections(&self) -> Vec<(String, &'a Value)> {
        match self.course.get("sections") {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Find a unit, registering fallback hits in the index
    fn lookup(&mut self, id: &str) -> Option<&UnitRecord> {
        if !self.index.contains(id) {
            if let Some(raw) = self.course.get(id).filter(|v| v.is_object() && v.has("objectType")) {
                debug!("Found unit {} via direct course lookup", id);
                self.index.insert(UnitRecord::from_value(id, raw));
            } else if let Some(raw) = self
                .course
                .get("videos")
                .and_then(|videos| videos.get(id))
                .filter(|v| is_present(v))
            {
                debug!("Found unit {} in course videos mapping", id);
                self.index.insert(UnitRecord::from_value(id, raw));
            }
        }
        self.index.get(id)
    }

    /// Resolve every learning path item
    pub fn resolve(mut self) -> ResolvedContent {
        let mut out = ResolvedContent::default();
        let sections = self.sections();
        out.stats.sections = sections.len();

        for (key, section) in &sections {
            let context = SectionContext {
                key,
                label: section.text("title").unwrap_or_else(|| key.clone()),
            };
            let Some(path) = section.sequence("learningPath") else {
                continue;
            };

            for raw_item in path {
                out.stats.items += 1;
                let item = LearningPathItem::from_value(raw_item);
                self.resolve_item(&item, &context, &mut out);
            }
        }

        out.videos.sort_by(|a, b| a.id.cmp(&b.id));
        out.pdfs.sort_by(|a, b| a.id.cmp(&b.id));
        out.unit_kinds = self.index.kind_histogram();

        info!(
            sections = out.stats.sections,
            items = out.stats.items,
            matched = out.stats.matched,
            unresolved = out.stats.unresolved,
            "Extracted {} videos and {} PDFs",
            out.videos.len(),
            out.pdfs.len()
        );
        out
    }

    fn resolve_item(&mut self, item: &LearningPathItem, section: &SectionContext<'_>, out: &mut ResolvedContent) {
        let Some(id) = item.id.as_deref() else {
            out.stats.missing_identifier += 1;
            out.diagnostics.record(Issue::MissingIdentifier {
                section: section.label.clone(),
            });
            return;
        };

        let default_video_type = self.default_video_type.clone();
        let Some(unit) = self.lookup(id) else {
            out.stats.unresolved += 1;
            out.diagnostics.record(Issue::UnresolvedUnit {
                unit_id: id.to_string(),
                declared_type: item.declared_type.clone().unwrap_or_default(),
                section: section.label.clone(),
            });
            return;
        };
        out.stats.matched += 1;

        let kind = if unit.kind.is_known() {
            unit.kind.clone()
        } else {
            UnitKind::parse(item.declared_type.as_deref())
        };
        let source_id = unit.source_id.clone().unwrap_or_else(|| id.to_string());

        let detail = match kind {
            UnitKind::Pdf => ContentDetail::Pdf(PdfDetail {
                source_id,
                pdf_name: unit
                    .pdf_name
                    .clone()
                    .or_else(|| unit.pdf_path.clone())
                    .unwrap_or_default(),
                pdf_path: unit.pdf_path.clone().unwrap_or_default(),
                course_section: unit
                    .course_section
                    .clone()
                    .unwrap_or_else(|| section.key.to_string()),
            }),
            UnitKind::Video => ContentDetail::Video(VideoDetail {
                source_id,
                duration: unit.duration.unwrap_or(0.0),
                video_type: unit.video_type.clone().unwrap_or(default_video_type),
            }),
            _ => {
                debug!(id, kind = %kind, "Skipping unit that is neither video nor PDF");
                out.stats.other_kinds += 1;
                return;
            }
        };

        let entry = ContentEntry {
            id: id.to_string(),
            title: unit
                .title
                .clone()
                .or_else(|| item.unit_title.clone())
                .unwrap_or_else(|| UNTITLED.to_string()),
            section: section.label.clone(),
            section_id: section.key.to_string(),
            kind,
            order: item.order,
            detail,
        };

        let missing_name = matches!(&entry.detail, ContentDetail::Pdf(pdf) if pdf.pdf_name.is_empty());
        if missing_name {
            debug!(id = %entry.id, title = %entry.title, "PDF unit has no file name");
        }
        match entry.kind {
            UnitKind::Pdf => out.pdfs.push(entry),
            _ => out.videos.push(entry),
        }
    }
}

/// Build the index for `course` and resolve its learning paths
pub fn resolve_course(course: &Value) -> ResolvedContent {
    LearningPathResolver::for_course(course).resolve()
}
