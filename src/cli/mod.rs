//! Command-line interface for coursemap.
//!
//! Provides commands for listing the courses in a notifications response,
//! organizing a course response into playable and PDF catalogs, and
//! inspecting the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::fs;

use crate::catalog::CatalogExtractor;
use crate::config;
use crate::content::{harvest_pdfs, organize_course, OrganizeOptions, OrganizedCourse};
use crate::diagnostics::Diagnostics;
use crate::document::{course_body, Fields};
use crate::library::{save_pdf_catalog, DownloadPlan, PlayableCatalog};

/// coursemap - Course catalog and content extraction for learning platform exports
#[derive(Parser, Debug)]
#[command(name = "coursemap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the accessible courses in a notifications response
    Courses {
        /// Notifications JSON file
        notifications: PathBuf,

        /// Print the course list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a course response into video and PDF catalogs
    Organize {
        /// Course JSON file
        course: PathBuf,

        /// Course slug used in output file names
        #[arg(short, long, conflicts_with = "notifications")]
        slug: Option<String>,

        /// Notifications JSON file to pick the course slug from
        #[arg(short, long, requires = "select")]
        notifications: Option<PathBuf>,

        /// 1-based position (or slug) of the course in the notifications list
        #[arg(long, requires = "notifications")]
        select: Option<String>,

        /// Output directory (defaults to the configured output)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write pdfs_<slug>/manifest.json
        #[arg(long)]
        manifest: bool,
    },

    /// Show the PDFs harvested from a course response
    Pdfs {
        /// Course JSON file
        course: PathBuf,

        /// Print the PDF catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Courses {
                notifications,
                json,
            } => list_courses(&notifications, json).await,
            Commands::Organize {
                course,
                slug,
                notifications,
                select,
                out,
                manifest,
            } => {
                let document = read_document(&course).await?;
                let slug = match (slug, notifications, select) {
                    (Some(slug), _, _) => slug,
                    (None, Some(notifications), Some(select)) => {
                        select_slug(&notifications, &select).await?
                    }
                    _ => default_slug(&document, &course),
                };
                organize(&document, &slug, out, manifest).await
            }
            Commands::Pdfs { course, json } => list_pdfs(&course, json).await,
            Commands::Config => show_config(),
        }
    }
}

/// Read and parse a JSON document
async fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

/// Course slug from the document, else the file stem
fn default_slug(document: &Value, path: &Path) -> String {
    course_body(document)
        .first_text(&["slug", "courseSlug"])
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "course".to_string())
}

async fn select_slug(notifications: &Path, select: &str) -> Result<String> {
    let document = read_document(notifications).await?;
    let courses = CatalogExtractor::new().extract(&document).courses;

    let course = courses
        .select_input(select)
        .or_else(|_| courses.find_by_slug(select))
        .with_context(|| format!("No course matches '{}'", select))?;

    course
        .slug
        .clone()
        .with_context(|| format!("Course '{}' has no slug", course.name))
}

async fn list_courses(path: &Path, json: bool) -> Result<()> {
    let document = read_document(path).await?;
    let catalog = CatalogExtractor::new().extract(&document);

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.courses)?);
        return Ok(());
    }

    if catalog.courses.is_empty() {
        println!("No accessible courses found in {}", path.display());
        print_diagnostics(&catalog.diagnostics);
        return Ok(());
    }

    println!("{:<4} {:<40} {:<40}", "#", "NAME", "SLUG");
    println!("{}", "-".repeat(84));

    for (position, course) in catalog.courses.iter().enumerate() {
        let mut name = course.name.clone();
        if course.is_available {
            name.push_str(" (available)");
        }
        println!(
            "{:<4} {:<40} {:<40}",
            position + 1,
            truncate(&name, 38),
            course.slug.as_deref().unwrap_or("-")
        );
    }

    println!("\nTotal: {} courses", catalog.courses.len());

    Ok(())
}

async fn organize(document: &Value, slug: &str, out: Option<PathBuf>, manifest: bool) -> Result<()> {
    let cfg = config::config()?;
    let out_dir = out.unwrap_or_else(|| cfg.output.clone());

    let options = OrganizeOptions {
        default_video_type: cfg.playback.default_video_type.clone(),
    };
    let course = organize_course(document, slug, &options);

    let playable = PlayableCatalog::from_course(&course, &cfg.playback.url_template);
    let playable_path = playable.save(&out_dir, Utc::now()).await?;
    let pdf_path = save_pdf_catalog(&course.harvested_pdfs, &out_dir, slug).await?;

    let manifest_path = if manifest {
        let plan = DownloadPlan::for_catalog(&course.harvested_pdfs, &out_dir, slug);
        Some(plan.save_manifest().await?)
    } else {
        None
    };

    print_summary(&course);
    println!();
    println!("Videos:   {}", playable_path.display());
    println!("PDFs:     {}", pdf_path.display());
    if let Some(path) = manifest_path {
        println!("Manifest: {}", path.display());
    }

    Ok(())
}

fn print_summary(course: &OrganizedCourse) {
    let stats = &course.stats;

    println!("Course: {} ({})", course.course_title, course.course_slug);
    println!();
    println!("  Sections:            {}", stats.sections);
    println!("  Path items:          {}", stats.items);
    println!("  Matched:             {}", stats.matched);
    println!("  Missing identifier:  {}", stats.missing_identifier);
    println!("  Unresolved:          {}", stats.unresolved);
    println!("  Videos:              {}", course.videos.len());
    println!("  PDFs (paths):        {}", course.pdfs.len());
    println!("  PDFs (harvested):    {}", course.harvested_pdfs.len());

    if !course.unit_kinds.is_empty() {
        println!();
        println!("Units by kind:");
        for (kind, count) in &course.unit_kinds {
            println!("  {:<18} {}", kind, count);
        }
    }

    print_diagnostics(&course.diagnostics);
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }

    println!();
    println!("Issues:");
    for (kind, count) in diagnostics.summary() {
        println!("  {:<22} {}", format!("{:?}", kind), count);
    }
}

async fn list_pdfs(path: &Path, json: bool) -> Result<()> {
    let document = read_document(path).await?;
    let harvest = harvest_pdfs(course_body(&document));

    if json {
        println!("{}", serde_json::to_string_pretty(&harvest.catalog)?);
        return Ok(());
    }

    if harvest.catalog.is_empty() {
        println!("No PDFs found in {}", path.display());
        print_diagnostics(&harvest.diagnostics);
        return Ok(());
    }

    let slug = default_slug(&document, path);
    let plan = DownloadPlan::for_catalog(&harvest.catalog, Path::new("."), &slug);

    println!("{:<26} {:<50}", "ID", "FILE");
    println!("{}", "-".repeat(78));
    for download in &plan.downloads {
        println!("{:<26} {:<50}", download.id, download.path.display());
    }

    println!("\nTotal: {} PDFs", plan.len());
    if harvest.duplicates > 0 {
        println!("Duplicates ignored: {}", harvest.duplicates);
    }
    print_diagnostics(&harvest.diagnostics);

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("coursemap configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:   {}", cfg.home.display());
    println!("  Output: {}", cfg.output.display());
    println!();
    println!("Playback:");
    println!("  URL template:       {}", cfg.playback.url_template);
    println!("  Default video type: {}", cfg.playback.default_video_type);

    Ok(())
}

/// Truncate a string to max length, respecting char boundaries
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cli_parses_organize() {
        let cli = Cli::try_parse_from([
            "coursemap",
            "organize",
            "course.json",
            "--notifications",
            "n.json",
            "--select",
            "2",
            "--manifest",
        ])
        .unwrap();

        match cli.command {
            Commands::Organize {
                slug,
                select,
                manifest,
                ..
            } => {
                assert!(slug.is_none());
                assert_eq!(select.as_deref(), Some("2"));
                assert!(manifest);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_slug_with_notifications() {
        let result = Cli::try_parse_from([
            "coursemap",
            "organize",
            "course.json",
            "--slug",
            "dsa",
            "--notifications",
            "n.json",
            "--select",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_slug() {
        let path = Path::new("/tmp/grokking.json");
        assert_eq!(default_slug(&json!({"course": {"slug": "dsa"}}), path), "dsa");
        assert_eq!(default_slug(&json!({"title": "x"}), path), "grokking");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long course name", 10), "a long ...");
    }
}
