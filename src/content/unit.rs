//! Unit records and learning path items.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::document::Fields;

/// Content classification of a unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Video,
    Pdf,
    /// Any other declared type (quizzes, text pages, ...), kept verbatim
    Other(String),
    /// No type declared
    Unknown,
}

impl UnitKind {
    /// Classify a raw `objectType` / `type` string
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => UnitKind::Unknown,
            Some("ivideo") | Some("video") => UnitKind::Video,
            Some("pdf") => UnitKind::Pdf,
            Some(other) => UnitKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UnitKind::Video => "video",
            UnitKind::Pdf => "pdf",
            UnitKind::Other(raw) => raw,
            UnitKind::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, UnitKind::Unknown)
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for UnitKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A unit as stored in the course document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    /// Identifier the unit is registered under
    pub id: String,

    /// Classification from `objectType`
    #[serde(rename = "objectType")]
    pub kind: UnitKind,

    pub title: Option<String>,

    /// Media id on the hosting provider (`sourceid`)
    pub source_id: Option<String>,

    /// Video length in seconds
    pub duration: Option<f64>,

    /// Video player type (`type`)
    pub video_type: Option<String>,

    /// Section the platform filed a PDF under
    pub course_section: Option<String>,

    /// `data.pdf_name`
    pub pdf_name: Option<String>,

    /// `data.pdf`
    pub pdf_path: Option<String>,

    /// `data.pdf_full`
    pub pdf_url: Option<String>,
}

impl UnitRecord {
    /// Read a unit from its raw mapping, registering it under `id`
    pub fn from_value(id: impl Into<String>, raw: &Value) -> Self {
        let data = raw.get("data").unwrap_or(&Value::Null);

        Self {
            id: id.into(),
            kind: UnitKind::parse(raw.get("objectType").and_then(Value::as_str)),
            title: raw.text("title"),
            source_id: raw.text("sourceid"),
            duration: raw.present("duration").and_then(Value::as_f64),
            video_type: raw.text("type"),
            course_section: raw.text("courseSection"),
            pdf_name: data.text("pdf_name"),
            pdf_path: data.text("pdf"),
            pdf_url: data.text("pdf_full"),
        }
    }
}

/// One reference in a section's learning path
#[derive(Debug, Clone, PartialEq)]
pub struct LearningPathItem {
    pub id: Option<String>,
    pub declared_type: Option<String>,
    pub order: i64,
    pub unit_title: Option<String>,
}

impl LearningPathItem {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            id: raw.text("id"),
            declared_type: raw.text("type"),
            order: raw.integer_or("order", 0),
            unit_title: raw.text("unitTitle"),
        }
    }
}
