//! Whole-document PDF harvesting.
//!
//! Independent of the learning paths: every mapping anywhere in the course
//! document that looks like a complete PDF unit is collected. The first
//! record seen for an id wins; the result is ordered by id. This is the PDF
//! list that gets persisted.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::diagnostics::{Diagnostics, Issue};
use crate::document::{as_text, Scanner, Visit};

/// One harvested PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfHarvestEntry {
    /// Unit id; the catalog key, so not repeated in the value
    #[serde(skip)]
    pub id: String,
    pub pdf_name: String,
    pub pdf_url: String,
}

/// Harvested PDFs keyed and ordered by unit id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PdfCatalog {
    entries: BTreeMap<String, PdfHarvestEntry>,
}

impl PdfCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the id is already present; returns `true` if inserted
    pub fn insert_first(&mut self, entry: PdfHarvestEntry) -> bool {
        use std::collections::btree_map::Entry;

        match self.entries.entry(entry.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&PdfHarvestEntry> {
        self.entries.get(id)
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &PdfHarvestEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one harvest
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub catalog: PdfCatalog,
    /// Complete records dropped because their id was already taken
    pub duplicates: usize,
    pub diagnostics: Diagnostics,
}

enum Candidate {
    NotPdf,
    Complete(PdfHarvestEntry),
    Malformed {
        id: Option<String>,
        field: &'static str,
    },
}

fn classify(node: &Map<String, Value>) -> Candidate {
    if node.get("objectType").and_then(Value::as_str) != Some("pdf") {
        return Candidate::NotPdf;
    }

    let id = node.get("id").and_then(as_text);
    let data = node.get("data").filter(|d| d.is_object());
    let name = data.and_then(|d| d.get("pdf_name")).and_then(as_text);
    let url = data.and_then(|d| d.get("pdf_full")).and_then(as_text);

    match (id, name, url) {
        (Some(id), Some(pdf_name), Some(pdf_url)) => Candidate::Complete(PdfHarvestEntry {
            id,
            pdf_name,
            pdf_url,
        }),
        (id, name, url) => {
            let field = if data.is_none() {
                "data"
            } else if name.is_none() {
                "data.pdf_name"
            } else if url.is_none() {
                "data.pdf_full"
            } else {
                "id"
            };
            Candidate::Malformed { id, field }
        }
    }
}

/// Collect every complete PDF record in `document`
pub fn harvest_pdfs(document: &Value) -> Harvest {
    let mut harvest = Harvest::default();
    let mut scanner = Scanner::new();

    scanner.scan(document, &mut |node| match classify(node) {
        Candidate::NotPdf => Visit::Descend,
        Candidate::Complete(entry) => {
            let id = entry.id.clone();
            if harvest.catalog.insert_first(entry) {
                debug!(id = %id, "Harvested PDF");
            } else {
                debug!(id = %id, "Ignoring duplicate PDF record");
                harvest.duplicates += 1;
            }
            Visit::Skip
        }
        Candidate::Malformed { id, field } => {
            harvest.diagnostics.record(Issue::MalformedPdfRecord { id, field });
            Visit::Descend
        }
    });

    info!("Harvested {} PDFs", harvest.catalog.len());
    harvest
}
