//! Ordered, duplicate-free course list.
//!
//! Identity is slug OR id: an incoming summary that shares either with an
//! existing entry is dropped. The first entry wins and insertion order is
//! the display order.

use serde::Serialize;
use thiserror::Error;

use super::course::CourseSummary;

/// Errors when picking a course from the list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection: '{0}' is not a number")]
    NotANumber(String),

    #[error("Invalid selection: {position} (choose 1-{len})")]
    OutOfRange { position: usize, len: usize },

    #[error("No course with slug '{0}'")]
    UnknownSlug(String),

    #[error("No courses to select from")]
    Empty,
}

/// Courses in discovery order, deduplicated by slug or id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CourseList {
    courses: Vec<CourseSummary>,
}

impl CourseList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a course with this slug or id is already listed
    pub fn contains(&self, slug: Option<&str>, id: Option<&str>) -> bool {
        self.courses.iter().any(|c| c.same_course(slug, id))
    }

    /// Append unless a course with the same slug or id exists.
    ///
    /// Returns `true` if the course was added.
    pub fn push_unique(&mut self, course: CourseSummary) -> bool {
        if self.contains(course.slug.as_deref(), course.id.as_deref()) {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Fallback display number for an unnamed course
    pub fn next_ordinal(&self) -> usize {
        self.courses.len() + 1
    }

    /// Pick by 1-based display position
    pub fn select(&self, position: usize) -> Result<&CourseSummary, SelectionError> {
        if self.courses.is_empty() {
            return Err(SelectionError::Empty);
        }
        position
            .checked_sub(1)
            .and_then(|index| self.courses.get(index))
            .ok_or(SelectionError::OutOfRange {
                position,
                len: self.courses.len(),
            })
    }

    /// Pick by user-typed 1-based position
    pub fn select_input(&self, input: &str) -> Result<&CourseSummary, SelectionError> {
        let trimmed = input.trim();
        let position = trimmed
            .parse::<usize>()
            .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;
        self.select(position)
    }

    /// Pick by slug
    pub fn find_by_slug(&self, slug: &str) -> Result<&CourseSummary, SelectionError> {
        self.courses
            .iter()
            .find(|c| c.slug.as_deref() == Some(slug))
            .ok_or_else(|| SelectionError::UnknownSlug(slug.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseSummary> {
        self.courses.iter()
    }

    pub fn as_slice(&self) -> &[CourseSummary] {
        &self.courses
    }

    pub fn into_vec(self) -> Vec<CourseSummary> {
        self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
