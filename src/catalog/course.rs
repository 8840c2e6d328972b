//! Course summaries and the enrollment predicate.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The `me` sub-record of a course entry, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enrollment(Value);

impl Enrollment {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Placeholder for courses listed as available rather than enrolled
    pub fn neutral() -> Self {
        Self(json!({ "registered": false, "premium": null }))
    }

    pub fn registered(&self) -> Option<&Value> {
        self.0.get("registered")
    }

    pub fn premium(&self) -> Option<&Value> {
        self.0.get("premium")
    }

    /// Whether this record grants paid access
    pub fn grants_access(&self) -> bool {
        grants_access(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Enrollment predicate.
///
/// `registered` must not be literally `false`, and `premium` must exist and
/// not be `null`. A `premium` of `false` passes.
pub fn grants_access(me: &Value) -> bool {
    let registered_ok = !matches!(me.get("registered"), Some(Value::Bool(false)));
    let premium_ok = !matches!(me.get("premium"), None | Some(Value::Null));
    registered_ok && premium_ok
}

/// One entry of the course list shown for selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// Display name
    pub name: String,

    /// Slug used to fetch the course document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Platform id of the course entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Secondary course id, when the entry carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    /// Enrollment sub-record
    #[serde(rename = "me")]
    pub enrollment: Enrollment,

    /// Listed because it is purchasable, not because the user owns it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_available: bool,
}

impl CourseSummary {
    pub fn new(name: impl Into<String>, enrollment: Enrollment) -> Self {
        Self {
            name: name.into(),
            slug: None,
            id: None,
            course_id: None,
            enrollment,
            is_available: false,
        }
    }

    pub fn with_slug(mut self, slug: Option<String>) -> Self {
        self.slug = slug;
        self
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_course_id(mut self, course_id: Option<String>) -> Self {
        self.course_id = course_id;
        self
    }

    pub fn available(mut self) -> Self {
        self.is_available = true;
        self
    }

    /// Whether two summaries describe the same course (shared slug or id)
    pub fn same_course(&self, slug: Option<&str>, id: Option<&str>) -> bool {
        let slug_match = matches!((self.slug.as_deref(), slug), (Some(a), Some(b)) if a == b);
        let id_match = matches!((self.id.as_deref(), id), (Some(a), Some(b)) if a == b);
        slug_match || id_match
    }
}
