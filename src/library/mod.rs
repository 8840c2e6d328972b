//! Output artifacts for organized courses.
//!
//! # Output Layout
//!
//! ```text
//! <output>/
//! ├── organized_<slug>_<millis>.json   # Playable videos
//! ├── pdfs_<slug>.json                 # Harvested PDFs keyed by unit id
//! └── pdfs_<slug>/
//!     └── manifest.json                # Planned PDF downloads (optional)
//! ```

pub mod catalog;
pub mod download;

pub use catalog::{
    pdf_catalog_file_name, playback_url, save_pdf_catalog, PlayableCatalog, PlayableVideo,
    DEFAULT_PLAYBACK_TEMPLATE,
};
pub use download::{pdf_dir, pdf_file_name, safe_component, DownloadPlan, PlannedDownload};
