//! Course catalog extraction from the notifications document.
//!
//! The notifications endpoint returns whatever the landing page needs, and
//! the courses the user owns can sit in several places inside it. This
//! module turns that document into one ordered, duplicate-free list of
//! [`CourseSummary`] values for display and selection.

pub mod course;
pub mod dedup;
pub mod strategy;

pub use course::{grants_access, CourseSummary, Enrollment};
pub use dedup::{CourseList, SelectionError};
pub use strategy::{extract_courses, CatalogExtractor, CourseCatalog, Match, Strategy};
