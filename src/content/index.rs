//! Unit index: every unit a course document stores, keyed by id.
//!
//! Units live in two places:
//!
//! 1. The `videos` mapping inside the course object.
//! 2. Directly on the course object, keyed either by the unit's own id or by
//!    a 24-character hex id, mixed in with ordinary course metadata.
//!
//! A later registration for the same id replaces the earlier one.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::debug;

use super::unit::UnitRecord;
use crate::document::Fields;

/// Course-object keys that hold metadata, never units
pub const COURSE_METADATA_KEYS: &[&str] = &[
    "title",
    "titleId",
    "courseType",
    "status",
    "tags",
    "description",
    "keywords",
    "goals",
    "points",
    "authors",
    "quotes",
    "order",
    "courseImage",
    "bgcolor",
    "price",
    "discountFlag",
    "discountPrice",
    "introVideoImage",
    "introVideoVimeoId",
    "knowledgeBadges",
    "dripFeed",
    "goalTotal",
    "numVideos",
    "numPages",
    "difficulty",
    "prerequisites",
    "socialMedia",
    "access",
    "registeredUsers",
    "inProducts",
    "expires",
    "expiresType",
    "short_url",
    "afterPurchase",
    "enrollButtonAllOptions",
    "courseCompletion",
    "courseNavigation",
    "coursePlayerSettings",
    "unitCompletion",
    "unitCompletion_v2",
    "disablePathPlayer",
    "identifiers",
    "courseNotificationSettings",
    "denormalizedUnitDataMap",
    "trialLimitExceeded",
    "created",
    "modified",
    "customMetadata",
    "user",
    "readOnlyLocks",
    "contentHash",
    "id",
    "containsLegacyUnits",
    "containsLiveSessions",
    "sections",
    "videos",
    "assessments",
    "postsCount",
    "currency",
];

/// Whether `key` is a 24-character lowercase hex id
pub fn is_hex_identifier(key: &str) -> bool {
    key.len() == 24 && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Mapping from unit id to unit record
#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    units: HashMap<String, UnitRecord>,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a course object's unit locations
    pub fn build(course: &Value) -> Self {
        let mut index = Self::new();

        if let Some(videos) = course.mapping("videos") {
            for unit in videos.values() {
                if let Some(id) = unit.text("id") {
                    index.insert(UnitRecord::from_value(id, unit));
                }
            }
            debug!("Found 'videos' mapping with {} entries", videos.len());
        }

        let mut from_course = 0;
        if let Some(fields) = course.as_object() {
            for (key, value) in fields {
                if COURSE_METADATA_KEYS.contains(&key.as_str()) || !value.is_object() {
                    continue;
                }

                let hex_key = is_hex_identifier(key);
                let own_id = value.text("id");

                let unit_id = if hex_key && value.has("objectType") {
                    match own_id {
                        Some(id) if id == *key => id,
                        _ => key.clone(),
                    }
                } else if value.has("objectType") {
                    match own_id {
                        Some(id) if id == *key || hex_key => id,
                        _ => continue,
                    }
                } else {
                    continue;
                };

                index.insert(UnitRecord::from_value(unit_id, value));
                from_course += 1;
            }
        }

        debug!(
            total = index.len(),
            from_course,
            "Built unit index"
        );
        index
    }

    /// Register a unit, replacing any unit with the same id
    pub fn insert(&mut self, unit: UnitRecord) -> Option<UnitRecord> {
        let previous = self.units.insert(unit.id.clone(), unit);
        if let Some(ref replaced) = previous {
            debug!(id = %replaced.id, "Unit registration replaced an earlier one");
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<&UnitRecord> {
        self.units.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit count per kind
    pub fn kind_histogram(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for unit in self.units.values() {
            *counts.entry(unit.kind.to_string()).or_insert(0) += 1;
        }
        counts
    }
}
