//! Non-fatal extraction issues.
//!
//! Nothing in the extraction passes aborts: an item that cannot be used is
//! skipped, the reason is recorded here, and the pass moves on.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A skipped item or a notable terminal state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("learning path item in section '{section}' has no id")]
    MissingIdentifier { section: String },

    #[error("unit data not found for '{unit_id}' (type: {declared_type}, section: {section})")]
    UnresolvedUnit {
        unit_id: String,
        declared_type: String,
        section: String,
    },

    #[error("pdf candidate {} is missing {field}", .id.as_deref().unwrap_or("<no id>"))]
    MalformedPdfRecord {
        id: Option<String>,
        field: &'static str,
    },

    #[error("no courses matched any extraction strategy")]
    EmptyCatalog,
}

/// Discriminant of [`Issue`], used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingIdentifier,
    UnresolvedUnit,
    MalformedPdfRecord,
    EmptyCatalog,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::MissingIdentifier { .. } => IssueKind::MissingIdentifier,
            Issue::UnresolvedUnit { .. } => IssueKind::UnresolvedUnit,
            Issue::MalformedPdfRecord { .. } => IssueKind::MalformedPdfRecord,
            Issue::EmptyCatalog => IssueKind::EmptyCatalog,
        }
    }
}

/// Issues collected during one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    issues: Vec<Issue>,
    counts: BTreeMap<IssueKind, usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue and log it.
    ///
    /// Only the first few issues of each kind are logged at warn level so a
    /// course with hundreds of broken references does not flood the output.
    pub fn record(&mut self, issue: Issue) {
        const LOGGED_PER_KIND: usize = 5;

        let seen = self.counts.entry(issue.kind()).or_insert(0);
        if *seen < LOGGED_PER_KIND {
            warn!("{}", issue);
        }
        *seen += 1;
        self.issues.push(issue);
    }

    /// Number of recorded issues of a kind
    pub fn count(&self, kind: IssueKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Counts per kind, for reports
    pub fn summary(&self) -> BTreeMap<IssueKind, usize> {
        self.counts.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Append another pass's issues
    pub fn extend(&mut self, other: Diagnostics) {
        for (kind, count) in other.counts {
            *self.counts.entry(kind).or_insert(0) += count;
        }
        self.issues.extend(other.issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(Issue::MissingIdentifier {
            section: "Intro".to_string(),
        });
        diagnostics.record(Issue::UnresolvedUnit {
            unit_id: "u1".to_string(),
            declared_type: "pdf".to_string(),
            section: "Intro".to_string(),
        });
        diagnostics.record(Issue::UnresolvedUnit {
            unit_id: "u2".to_string(),
            declared_type: "ivideo".to_string(),
            section: "Intro".to_string(),
        });

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.count(IssueKind::UnresolvedUnit), 2);
        assert_eq!(diagnostics.count(IssueKind::MissingIdentifier), 1);
        assert_eq!(diagnostics.count(IssueKind::EmptyCatalog), 0);
        assert_eq!(diagnostics.summary().get(&IssueKind::UnresolvedUnit), Some(&2));
    }

    #[test]
    fn test_counts_survive_bulk_record_and_extend() {
        let mut resolver_pass = Diagnostics::new();
        for n in 0..5_000 {
            resolver_pass.record(Issue::UnresolvedUnit {
                unit_id: format!("u{n}"),
                declared_type: "video".to_string(),
                section: "s".to_string(),
            });
        }

        let mut harvest_pass = Diagnostics::new();
        harvest_pass.record(Issue::MalformedPdfRecord {
            id: Some("p".to_string()),
            field: "data",
        });
        harvest_pass.record(Issue::UnresolvedUnit {
            unit_id: "late".to_string(),
            declared_type: "pdf".to_string(),
            section: "t".to_string(),
        });

        resolver_pass.extend(harvest_pass);
        assert_eq!(resolver_pass.len(), 5_002);
        assert_eq!(resolver_pass.count(IssueKind::UnresolvedUnit), 5_001);
        assert_eq!(resolver_pass.count(IssueKind::MalformedPdfRecord), 1);

        let total: usize = resolver_pass.summary().values().sum();
        assert_eq!(total, resolver_pass.len());
    }

    #[test]
    fn test_messages() {
        let issue = Issue::MalformedPdfRecord {
            id: None,
            field: "data.pdf_full",
        };
        assert_eq!(issue.to_string(), "pdf candidate <no id> is missing data.pdf_full");
        assert_eq!(
            Issue::EmptyCatalog.to_string(),
            "no courses matched any extraction strategy"
        );
    }
}
