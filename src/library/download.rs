//! Download plan for harvested PDFs.
//!
//! Downloading is done elsewhere; this only decides where each file goes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::catalog::write_json;
use crate::content::PdfCatalog;

/// Characters not allowed in file names on common filesystems
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace reserved characters so `raw` stays a single path component
pub fn safe_component(raw: &str) -> String {
    raw.chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

/// Local file name for a PDF: reserved characters replaced, one `.pdf` suffix
pub fn pdf_file_name(pdf_name: &str) -> String {
    let mut safe = safe_component(pdf_name);

    let stem_len = safe.len().saturating_sub(4);
    if safe.get(stem_len..).is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf")) {
        safe.truncate(stem_len);
    }
    format!("{}.pdf", safe)
}

/// Directory PDFs of a course are saved into
pub fn pdf_dir(base: &Path, slug: &str) -> PathBuf {
    base.join(format!("pdfs_{}", safe_component(slug)))
}

/// One planned download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDownload {
    pub id: String,
    pub pdf_name: String,
    pub url: String,
    pub path: PathBuf,
}

/// Every PDF of a course with its target path, in id order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadPlan {
    pub dir: PathBuf,
    pub downloads: Vec<PlannedDownload>,
}

impl DownloadPlan {
    pub fn for_catalog(catalog: &PdfCatalog, base: &Path, slug: &str) -> Self {
        let dir = pdf_dir(base, slug);
        let downloads = catalog
            .iter()
            .map(|entry| PlannedDownload {
                id: entry.id.clone(),
                pdf_name: entry.pdf_name.clone(),
                url: entry.pdf_url.clone(),
                path: dir.join(pdf_file_name(&entry.pdf_name)),
            })
            .collect();

        Self { dir, downloads }
    }

    /// Write `manifest.json` into the plan's directory
    pub async fn save_manifest(&self) -> Result<PathBuf> {
        let path = self.dir.join("manifest.json");
        write_json(&path, self).await?;
        info!("Download manifest ({} files) saved to: {}", self.len(), path.display());
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.downloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::harvest_pdfs;
    use serde_json::json;

    #[test]
    fn test_pdf_file_name() {
        assert_eq!(pdf_file_name("Lecture 1: Arrays"), "Lecture 1_ Arrays.pdf");
        assert_eq!(pdf_file_name("notes.PDF"), "notes.pdf");
        assert_eq!(pdf_file_name("a/b\\c?.pdf"), "a_b_c_.pdf");
        assert_eq!(pdf_file_name("pdf"), "pdf.pdf");
        assert_eq!(pdf_file_name("résumé"), "résumé.pdf");
        assert_eq!(pdf_file_name("नोट्स"), "नोट्स.pdf");
        assert_eq!(pdf_file_name("日本"), "日本.pdf");
        assert_eq!(pdf_file_name("नोट्स.pdf"), "नोट्स.pdf");
    }

    #[test]
    fn test_slug_cannot_leave_base_dir() {
        let base = Path::new("/out");
        let dir = pdf_dir(base, "/../../escaped");

        assert_eq!(dir, PathBuf::from("/out/pdfs__.._.._escaped"));
        assert_eq!(dir.parent(), Some(base));
        assert_eq!(pdf_dir(base, r"..\up").parent(), Some(base));
    }

    #[test]
    fn test_plan_for_catalog() {
        let doc = json!([
            {"objectType": "pdf", "id": "b", "data": {"pdf_name": "Two.pdf", "pdf_full": "https://cdn/2"}},
            {"objectType": "pdf", "id": "a", "data": {"pdf_name": "One", "pdf_full": "https://cdn/1"}}
        ]);
        let catalog = harvest_pdfs(&doc).catalog;

        let plan = DownloadPlan::for_catalog(&catalog, Path::new("/out"), "dsa");
        assert_eq!(plan.dir, PathBuf::from("/out/pdfs_dsa"));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.downloads[0].id, "a");
        assert_eq!(plan.downloads[0].path, PathBuf::from("/out/pdfs_dsa/One.pdf"));
        assert_eq!(plan.downloads[1].path, PathBuf::from("/out/pdfs_dsa/Two.pdf"));
        assert_eq!(plan.downloads[1].url, "https://cdn/2");
    }
}
