//! Course catalog extraction over notifications documents.

use coursemap::catalog::{CatalogExtractor, Match};
use coursemap::diagnostics::IssueKind;
use coursemap::extract_courses;
use serde_json::{json, Value};

fn slugs(root: &Value) -> Vec<String> {
    extract_courses(root)
        .iter()
        .map(|c| c.slug.clone().unwrap_or_default())
        .collect()
}

#[test]
fn test_sectioned_end_to_end() {
    let root = json!({
        "sections": [{
            "courses": [{
                "id": "c1",
                "title": "Course A",
                "slug": "a",
                "me": {"registered": true, "premium": "gold"}
            }]
        }]
    });

    let courses = extract_courses(&root);
    assert_eq!(
        serde_json::to_value(&courses).unwrap(),
        json!([{
            "name": "Course A",
            "slug": "a",
            "id": "c1",
            "me": {"registered": true, "premium": "gold"}
        }])
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let root = json!({
        "sections": [{"courses": [
            {"slug": "a", "title": "A", "me": {"registered": true, "premium": 1}}
        ]}],
        "courses": {
            "x": {"identifiers": {"slug": "b"}, "title": "B", "me": {"premium": "p"}},
            "y": {"slug": "c", "title": "C", "me": {"registered": true, "premium": true}}
        }
    });

    let first = serde_json::to_string(&extract_courses(&root)).unwrap();
    let second = serde_json::to_string(&extract_courses(&root)).unwrap();
    assert_eq!(first, second);
    assert_eq!(slugs(&root), ["a", "b", "c"]);
}

#[test]
fn test_no_duplicate_slug_or_id_across_strategies() {
    let root = json!({
        "sections": [{"courses": [
            {"id": "1", "slug": "a", "me": {"registered": true, "premium": "x"}},
            {"id": "1", "slug": "a", "me": {"registered": true, "premium": "x"}}
        ]}],
        "courses": {
            "k1": {"id": "1", "slug": "a", "me": {"registered": true, "premium": "x"}},
            "k2": {"id": "2", "slug": "b", "me": {"registered": true, "premium": "x"}}
        }
    });

    let courses = extract_courses(&root);
    assert_eq!(courses.len(), 2);

    let mut ids: Vec<_> = courses.iter().filter_map(|c| c.id.clone()).collect();
    ids.dedup();
    assert_eq!(ids, ["1", "2"]);
}

#[test]
fn test_enrollment_predicate() {
    let root = json!({
        "courses": [
            {"slug": "unregistered", "me": {"registered": false, "premium": "x"}},
            {"slug": "null-premium", "me": {"registered": true, "premium": null}},
            {"slug": "absent-premium", "me": {"registered": true}},
            {"slug": "false-premium", "me": {"premium": false}},
            {"slug": "paid", "me": {"registered": true, "premium": "x"}}
        ]
    });

    assert_eq!(slugs(&root), ["false-premium", "paid"]);
}

#[test]
fn test_fallbacks_run_only_when_empty() {
    let visible = json!({
        "courses": {
            "k1": {"slug": "free", "premium": false},
            "k2": {"slug": "pro", "title": "Pro", "premium": true}
        }
    });
    let courses = extract_courses(&visible);
    assert_eq!(courses.len(), 1);
    assert!(courses.as_slice()[0].is_available);
    assert_eq!(courses.as_slice()[0].name, "Pro");

    let nested = json!({
        "data": {"user": {"library": [
            {"slug": "deep", "name": "Deep", "me": {"registered": true, "premium": "y"}}
        ]}}
    });
    assert_eq!(slugs(&nested), ["deep"]);
}

#[test]
fn test_empty_catalog_is_reported() {
    let catalog = CatalogExtractor::new().extract(&json!({"user": {"name": "x"}}));

    assert!(catalog.courses.is_empty());
    assert_eq!(catalog.diagnostics.count(IssueKind::EmptyCatalog), 1);
    assert!(catalog
        .outcomes
        .iter()
        .take(4)
        .all(|(_, outcome)| *outcome == Match::Pass));
}

#[test]
fn test_select_by_position_and_slug() {
    let root = json!({
        "courses": [
            {"slug": "a", "me": {"registered": true, "premium": "x"}},
            {"slug": "b", "me": {"registered": true, "premium": "x"}}
        ]
    });
    let courses = extract_courses(&root);

    assert_eq!(courses.select_input("2").unwrap().slug.as_deref(), Some("b"));
    assert!(courses.select_input("0").is_err());
    assert!(courses.select_input("3").is_err());
    assert!(courses.select_input("two").is_err());
    assert_eq!(courses.find_by_slug("a").unwrap().slug.as_deref(), Some("a"));
}
