//! Course extraction strategies.
//!
//! The notifications document lists courses in several shapes depending on
//! the page and the account. Each shape gets a [`Strategy`]; the
//! [`CatalogExtractor`] runs them in priority order against one shared
//! [`CourseList`], so later strategies append to what earlier ones found.
//!
//! | Priority | Strategy | Shape |
//! |----------|----------|-------|
//! | 1 | [`Sectioned`] | `sections[].courses[]` |
//! | 2 | [`KeyedCourses`] | `courses: { <id>: course }` |
//! | 3 | [`SequenceCourses`] | `courses: [course]` |
//! | 4 | [`VisibleFallback`] | `courses: {...}`, premium courses, only if nothing matched |
//! | 5 | [`RecursiveFallback`] | anything with a slug and `me`, only if nothing matched |

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::course::{grants_access, CourseSummary, Enrollment};
use super::dedup::CourseList;
use crate::diagnostics::{Diagnostics, Issue};
use crate::document::{Fields, Scanner, Visit};

/// Result of offering a document to one strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Match {
    /// The shape was there; `added` courses survived dedup
    Matched { added: usize },
    /// The shape was absent or the strategy's guard did not hold
    Pass,
}

/// One candidate document shape
pub trait Strategy {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Append matching courses from `root` to `found`
    fn apply(&self, root: &Value, found: &mut CourseList) -> Match;
}

/// Slug lookup order for entries under a keyed `courses` mapping
const KEYED_SLUG_PATH: &[&str] = &["/identifiers/slug", "/slug", "/titleId", "/id"];

/// Slug lookup order for entries in a sequence
const LISTED_SLUG_PATH: &[&str] = &["/identifiers/slug", "/slug", "/name"];

/// Where a course entry keeps its slug and display name
struct EntryShape {
    slug_path: &'static [&'static str],
    name_keys: &'static [&'static str],
    /// Use the chosen slug as the name when no name key is set
    named_by_slug: bool,
}

const KEYED: EntryShape = EntryShape {
    slug_path: KEYED_SLUG_PATH,
    name_keys: &["title", "name"],
    named_by_slug: true,
};

/// Sequence entries fall back to their own `slug` field, never a nested slug
const LISTED: EntryShape = EntryShape {
    slug_path: LISTED_SLUG_PATH,
    name_keys: &["title", "name", "slug"],
    named_by_slug: false,
};

fn first_at(entry: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| entry.text_at(p))
}

/// Summarize a course entry whose `me` record grants access
fn enrolled_summary(entry: &Value, shape: &EntryShape, found: &CourseList) -> Option<CourseSummary> {
    let me = entry.get("me").filter(|me| me.is_object())?;
    if !grants_access(me) {
        return None;
    }

    let slug = first_at(entry, shape.slug_path);
    let name = entry
        .first_text(shape.name_keys)
        .or_else(|| slug.clone().filter(|_| shape.named_by_slug))
        .unwrap_or_else(|| format!("Course {}", found.next_ordinal()));

    Some(
        CourseSummary::new(name, Enrollment::new(me.clone()))
            .with_slug(slug)
            .with_id(entry.text("id")),
    )
}

fn push_all<'a>(
    entries: impl Iterator<Item = &'a Value>,
    shape: &EntryShape,
    found: &mut CourseList,
) -> usize {
    let mut added = 0;
    for entry in entries {
        if let Some(course) = enrolled_summary(entry, shape, found) {
            if found.push_unique(course) {
                added += 1;
            }
        }
    }
    added
}

/// `sections[].courses[]`
#[derive(Debug, Default)]
pub struct Sectioned;

impl Strategy for Sectioned {
    fn name(&self) -> &'static str {
        "sectioned"
    }

    fn apply(&self, root: &Value, found: &mut CourseList) -> Match {
        let Some(sections) = root.sequence("sections") else {
            return Match::Pass;
        };

        let entries = sections
            .iter()
            .filter_map(|section| section.sequence("courses"))
            .flatten();
        Match::Matched {
            added: push_all(entries, &LISTED, found),
        }
    }
}

/// `courses` as a mapping keyed by course id
#[derive(Debug, Default)]
pub struct KeyedCourses;

impl Strategy for KeyedCourses {
    fn name(&self) -> &'static str {
        "keyed_courses"
    }

    fn apply(&self, root: &Value, found: &mut CourseList) -> Match {
        let Some(courses) = root.mapping("courses") else {
            return Match::Pass;
        };

        Match::Matched {
            added: push_all(courses.values(), &KEYED, found),
        }
    }
}

/// `courses` as a plain sequence
#[derive(Debug, Default)]
pub struct SequenceCourses;

impl Strategy for SequenceCourses {
    fn name(&self) -> &'static str {
        "sequence_courses"
    }

    fn apply(&self, root: &Value, found: &mut CourseList) -> Match {
        let Some(courses) = root.sequence("courses") else {
            return Match::Pass;
        };

        Match::Matched {
            added: push_all(courses.iter(), &LISTED, found),
        }
    }
}

/// Every premium course in a keyed `courses` mapping, listed as available.
///
/// Runs only when the enrolled strategies found nothing.
#[derive(Debug, Default)]
pub struct VisibleFallback;

impl Strategy for VisibleFallback {
    fn name(&self) -> &'static str {
        "visible_fallback"
    }

    fn apply(&self, root: &Value, found: &mut CourseList) -> Match {
        if !found.is_empty() {
            return Match::Pass;
        }
        let Some(courses) = root.mapping("courses") else {
            return Match::Pass;
        };

        info!("No registered courses found, listing available premium courses");
        let mut added = 0;
        for entry in courses.values() {
            if entry.get("premium") != Some(&Value::Bool(true)) {
                continue;
            }

            let slug = first_at(entry, KEYED_SLUG_PATH);
            let name = entry
                .first_text(&["title", "name"])
                .or_else(|| slug.clone())
                .unwrap_or_else(|| format!("Course {}", found.next_ordinal()));
            let enrollment = entry
                .present("me")
                .cloned()
                .map(Enrollment::new)
                .unwrap_or_else(Enrollment::neutral);

            let course = CourseSummary::new(name, enrollment)
                .with_slug(slug)
                .with_id(entry.text("id"))
                .available();
            if found.push_unique(course) {
                added += 1;
            }
        }
        Match::Matched { added }
    }
}

/// Depth-first search of the whole document for course-like nodes.
///
/// Runs only when every other strategy came up empty.
#[derive(Debug, Default)]
pub struct RecursiveFallback;

impl RecursiveFallback {
    fn summarize(node: &Map<String, Value>, found: &CourseList) -> Option<CourseSummary> {
        let text = |key: &str| node.get(key).and_then(crate::document::as_text);

        let slug = text("slug").or_else(|| text("name")).or_else(|| text("courseId"))?;
        let me = node.get("me").filter(|me| me.is_object())?;
        if !grants_access(me) {
            return None;
        }

        let name = text("name")
            .or_else(|| text("title"))
            .or_else(|| text("slug"))
            .unwrap_or_else(|| format!("Course {}", found.next_ordinal()));

        Some(
            CourseSummary::new(name, Enrollment::new(me.clone()))
                .with_slug(Some(slug))
                .with_id(text("id").or_else(|| text("_id")))
                .with_course_id(text("courseId")),
        )
    }
}

impl Strategy for RecursiveFallback {
    fn name(&self) -> &'static str {
        "recursive_fallback"
    }

    fn apply(&self, root: &Value, found: &mut CourseList) -> Match {
        if !found.is_empty() {
            return Match::Pass;
        }

        let mut added = 0;
        let mut scanner = Scanner::new();
        scanner.scan(root, &mut |node| {
            if let Some(course) = Self::summarize(node, found) {
                if found.push_unique(course) {
                    added += 1;
                }
            }
            Visit::Descend
        });
        debug!(nodes = scanner.visited_count(), added, "Recursive course search finished");
        Match::Matched { added }
    }
}

/// Courses extracted from one notifications document
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    /// Deduplicated courses in discovery order
    pub courses: CourseList,

    /// Outcome of each strategy, in the order they ran
    pub outcomes: Vec<(&'static str, Match)>,

    /// `EmptyCatalog` when nothing matched
    pub diagnostics: Diagnostics,
}

/// Ordered chain of course strategies
pub struct CatalogExtractor {
    strategies: Vec<Box<dyn Strategy + Send + Sync>>,
}

impl Default for CatalogExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogExtractor {
    /// The standard five-strategy chain
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(Sectioned),
                Box::new(KeyedCourses),
                Box::new(SequenceCourses),
                Box::new(VisibleFallback),
                Box::new(RecursiveFallback),
            ],
        }
    }

    /// A chain with custom strategies, run in the given order
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy + Send + Sync>>) -> Self {
        Self { strategies }
    }

    /// Strategy names in run order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy against `root`
    pub fn extract(&self, root: &Value) -> CourseCatalog {
        let mut courses = CourseList::new();
        let mut outcomes = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let outcome = strategy.apply(root, &mut courses);
            debug!(strategy = strategy.name(), ?outcome, "Course strategy applied");
            outcomes.push((strategy.name(), outcome));
        }

        let mut diagnostics = Diagnostics::new();
        if courses.is_empty() {
            diagnostics.record(Issue::EmptyCatalog);
        }
        info!("Extracted {} courses", courses.len());

        CourseCatalog {
            courses,
            outcomes,
            diagnostics,
        }
    }
}

/// Extract courses with the standard chain
pub fn extract_courses(root: &Value) -> CourseList {
    CatalogExtractor::new().extract(root).courses
}
