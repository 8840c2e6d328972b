//! Course content extraction.
//!
//! A course document stores its units in more than one place and refers to
//! them from per-section learning paths. This module indexes the units,
//! resolves the paths into ordered video and PDF entries, and separately
//! harvests every complete PDF record in the document.
//!
//! ```text
//! course document ──► UnitIndex ──► LearningPathResolver ──► videos, pdfs
//!        │
//!        └──────────► harvest_pdfs ──► PdfCatalog (persisted)
//! ```

pub mod harvest;
pub mod index;
pub mod organize;
pub mod resolver;
pub mod unit;

pub use harvest::{harvest_pdfs, Harvest, PdfCatalog, PdfHarvestEntry};
pub use index::{is_hex_identifier, UnitIndex, COURSE_METADATA_KEYS};
pub use organize::{organize_course, OrganizeOptions, OrganizedCourse};
pub use resolver::{
    resolve_course, ContentDetail, ContentEntry, LearningPathResolver, PdfDetail, ResolveStats,
    ResolvedContent, VideoDetail, DEFAULT_VIDEO_TYPE,
};
pub use unit::{LearningPathItem, UnitKind, UnitRecord};
