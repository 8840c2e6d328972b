//! Optional-field accessors over `serde_json::Value`.

use serde_json::{Map, Value};

/// Whether a value counts as present (see module docs)
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a present string or number as text.
///
/// Ids arrive both as strings and as numbers; both collapse to a string.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if is_present(value) => Some(n.to_string()),
        _ => None,
    }
}

/// Unwrap the `{ "course": {...} }` envelope some endpoints use
pub fn course_body(document: &Value) -> &Value {
    match document.get("course") {
        Some(inner) if is_present(inner) => inner,
        _ => document,
    }
}

/// Field probes on a JSON value.
///
/// All methods return `None` (or the supplied default) when the receiver is
/// not a mapping, the key is missing, or the value has the wrong shape.
pub trait Fields {
    /// The value under `key` if it is present
    fn present(&self, key: &str) -> Option<&Value>;

    /// Whether `key` holds a present value
    fn has(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    /// The value under `key` as text
    fn text(&self, key: &str) -> Option<String>;

    /// The value under `key` as text, or `default`
    fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// The first key in `keys` that yields text
    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// The value at a JSON pointer (`/identifiers/slug`) as text
    fn text_at(&self, pointer: &str) -> Option<String>;

    /// The value under `key` if it is a mapping
    fn mapping(&self, key: &str) -> Option<&Map<String, Value>>;

    /// The value under `key` if it is a sequence
    fn sequence(&self, key: &str) -> Option<&Vec<Value>>;

    /// The value under `key` as a number, or `default`
    fn number_or(&self, key: &str, default: f64) -> f64;

    /// The value under `key` as an integer, or `default`
    fn integer_or(&self, key: &str, default: i64) -> i64;
}

impl Fields for Value {
    fn present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| is_present(v))
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(as_text)
    }

    fn text_at(&self, pointer: &str) -> Option<String> {
        self.pointer(pointer).and_then(as_text)
    }

    fn mapping(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    fn sequence(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    fn number_or(&self, key: &str, default: f64) -> f64 {
        self.present(key)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    fn integer_or(&self, key: &str, default: i64) -> i64 {
        match self.present(key) {
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence_rules() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(is_present(&json!(true)));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!(7)));
        assert!(is_present(&json!([])));
        assert!(is_present(&json!({})));
    }

    #[test]
    fn test_text_accepts_numbers() {
        let doc = json!({"id": 42, "slug": "dsa", "empty": "", "flag": true});

        assert_eq!(doc.text("id").as_deref(), Some("42"));
        assert_eq!(doc.text("slug").as_deref(), Some("dsa"));
        assert_eq!(doc.text("empty"), None);
        assert_eq!(doc.text("flag"), None);
        assert_eq!(doc.text("missing"), None);
        assert_eq!(doc.text_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_first_text_and_pointer() {
        let doc = json!({"name": "", "title": "Course", "identifiers": {"slug": "deep"}});

        assert_eq!(doc.first_text(&["name", "title"]).as_deref(), Some("Course"));
        assert_eq!(doc.text_at("/identifiers/slug").as_deref(), Some("deep"));
        assert_eq!(doc.text_at("/identifiers/missing"), None);
    }

    #[test]
    fn test_shape_probes() {
        let doc = json!({"map": {"a": 1}, "seq": [1, 2], "n": 3.5, "zero": 0});

        assert_eq!(doc.mapping("map").map(|m| m.len()), Some(1));
        assert!(doc.mapping("seq").is_none());
        assert_eq!(doc.sequence("seq").map(|s| s.len()), Some(2));
        assert!(doc.sequence("map").is_none());
        assert_eq!(doc.number_or("n", 0.0), 3.5);
        assert_eq!(doc.number_or("zero", 9.0), 9.0);
        assert_eq!(doc.integer_or("n", 0), 3);
        assert_eq!(doc.integer_or("missing", 5), 5);
    }

    #[test]
    fn test_non_mapping_receiver() {
        let doc = json!(["not", "a", "mapping"]);
        assert!(!doc.has("id"));
        assert_eq!(doc.text("id"), None);
    }

    #[test]
    fn test_course_body_unwraps_envelope() {
        let wrapped = json!({"course": {"title": "Inner"}});
        let bare = json!({"title": "Bare"});

        assert_eq!(course_body(&wrapped).text("title").as_deref(), Some("Inner"));
        assert_eq!(course_body(&bare).text("title").as_deref(), Some("Bare"));
    }
}
