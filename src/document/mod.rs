//! Schema-free access to parsed API documents.
//!
//! The learning platform returns JSON whose shape varies between endpoints
//! and over time. Nothing here assumes a schema: every read is an optional
//! probe with an explicit fallback, and the scanner walks whatever tree it
//! is handed.
//!
//! # Presence
//!
//! A field counts as *present* when it exists and is not `null`, `false`,
//! `0` or the empty string. Every fallback chain in the crate (title, slug,
//! source id, ...) uses this rule.

pub mod access;
pub mod scanner;

pub use access::{as_text, course_body, is_present, Fields};
pub use scanner::{Scanner, Visit};
