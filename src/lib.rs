//! coursemap - Course catalog and content extraction
//!
//! Turns the JSON responses of a learning platform into usable catalogs:
//! which courses an account can open, and which videos and PDFs each
//! course contains.
//!
//! # Modules
//!
//! - `document`: Presence rules and cycle-safe traversal over JSON values
//! - `catalog`: Course extraction from notifications responses
//! - `content`: Unit index, learning path resolution, PDF harvesting
//! - `library`: Output artifacts (playable catalog, PDF catalog, download plan)
//! - `diagnostics`: Non-fatal issues collected during extraction
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List accessible courses
//! coursemap courses notifications.json
//!
//! # Organize the second course from that list
//! coursemap organize course.json --notifications notifications.json --select 2
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod document;
pub mod library;

// Re-export main types at crate root for convenience
pub use catalog::{extract_courses, CatalogExtractor, CourseList, CourseSummary};
pub use content::{
    harvest_pdfs, organize_course, resolve_course, ContentEntry, OrganizedCourse, PdfCatalog,
    UnitIndex,
};
pub use diagnostics::{Diagnostics, Issue};
pub use library::{DownloadPlan, PlayableCatalog};
