//! Property paths over loose JSON.
//!
//! A path is dot-separated (`personal_info.contact.email`). A purely numeric
//! segment indexes into an array (`skills.0`). `$` on its own is the document root.

use serde_json::Value;

/// Path that resolves to the document itself.
pub const ROOT: &str = "$";

/// Follows `path` through `document`. Missing keys, out-of-range indexes and
/// stepping into a scalar all yield `None`.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() || path == ROOT {
        return Some(document);
    }
    path.split('.').try_fold(document, step)
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Null, `[]` and `{}` carry no section data.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Like `is_empty_value`, but a whitespace-only string also counts as absent.
/// Used for individual display fields.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        other => is_empty_value(other),
    }
}

/// First candidate that resolves to a non-empty value, with the path that matched.
pub fn first_non_empty<'a, 'p>(
    document: &'a Value,
    candidates: &[&'p str],
) -> Option<(&'p str, &'a Value)> {
    candidates.iter().find_map(|&path| {
        resolve_path(document, path)
            .filter(|v| !is_empty_value(v))
            .map(|v| (path, v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_path() {
        let doc = json!({"personal_info": {"contact": {"email": "ada@example.com"}}});
        assert_eq!(
            resolve_path(&doc, "personal_info.contact.email"),
            Some(&json!("ada@example.com"))
        );
    }

    #[test]
    fn test_numeric_segment_indexes_array() {
        let doc = json!({"skills": ["Rust", "Go"]});
        assert_eq!(resolve_path(&doc, "skills.1"), Some(&json!("Go")));
        assert_eq!(resolve_path(&doc, "skills.7"), None);
    }

    #[test]
    fn test_root_path() {
        let doc = json!({"email": "a@b.c"});
        assert_eq!(resolve_path(&doc, ROOT), Some(&doc));
    }

    #[test]
    fn test_stepping_into_scalar_is_none() {
        let doc = json!({"name": "Ada"});
        assert_eq!(resolve_path(&doc, "name.first"), None);
        assert_eq!(resolve_path(&json!(null), "anything"), None);
    }

    #[test]
    fn test_emptiness() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!("")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!([null])));
    }

    #[test]
    fn test_blank_string_is_blank() {
        assert!(is_blank(&json!("   ")));
        assert!(!is_blank(&json!("x")));
        assert!(is_blank(&json!({})));
    }

    #[test]
    fn test_first_non_empty_skips_empty_candidates() {
        let doc = json!({"employment_history": [], "experience": {}, "work_experience": [{"title": "SRE"}]});
        let (path, value) =
            first_non_empty(&doc, &["employment_history", "experience", "work_experience"]).unwrap();
        assert_eq!(path, "work_experience");
        assert_eq!(value, &json!([{"title": "SRE"}]));
    }

    #[test]
    fn test_first_non_empty_none_when_all_missing() {
        let doc = json!({"unrelated": 1});
        assert!(first_non_empty(&doc, &["a", "b.c"]).is_none());
    }
}
