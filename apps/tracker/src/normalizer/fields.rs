//! Field-level fallback — projects one item of a resolved section into named display fields.
//!
//! Every field has its own ordered candidate list and is resolved on its own, so
//! two fields of the same item may come from different historical schemas
//! (`name` from one, `issuer` from another).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalizer::classify::{classify, Bucket, CategoryFamily};
use crate::normalizer::path::{is_blank, resolve_path};
use crate::normalizer::scalar::display_text;

/// Field name used for items that are bare scalars, and for keyed-group values.
pub const VALUE_FIELD: &str = "value";
/// Field name carrying the key of a keyed-group item.
pub const LABEL_FIELD: &str = "label";

/// One display field and the paths, relative to the item, that may hold it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
    pub classify: Option<CategoryFamily>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self {
            name,
            candidates,
            classify: None,
        }
    }

    /// Also emits a badge classifying the resolved text within `family`.
    pub const fn classified(self, family: CategoryFamily) -> Self {
        Self {
            classify: Some(family),
            ..self
        }
    }
}

/// Classification of one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub field: &'static str,
    pub text: String,
    pub bucket: Bucket,
}

/// A section item after field-level fallback. Fields that resolved to nothing are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub fields: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
}

impl DisplayItem {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// First candidate path of `item` whose value is non-blank, rendered for display.
pub fn resolve_field(item: &Value, candidates: &[&str]) -> Option<String> {
    find_field(item, candidates).map(|(_, text)| text)
}

fn find_field<'a>(item: &'a Value, candidates: &[&str]) -> Option<(&'a Value, String)> {
    candidates.iter().find_map(|path| {
        resolve_path(item, path)
            .filter(|v| !is_blank(v))
            .and_then(|v| display_text(v).map(|text| (v, text)))
    })
}

impl DisplayItem {
    fn insert(&mut self, spec: &FieldSpec, text: String) {
        if let Some(family) = spec.classify {
            self.badges.push(Badge {
                field: spec.name,
                text: text.clone(),
                bucket: classify(&text, family),
            });
        }
        self.fields.insert(spec.name, text);
    }
}

/// Projects a single item. Bare scalars become a `value` field; an item where
/// nothing resolves yields `None`.
pub fn project_item(item: &Value, fields: &[FieldSpec]) -> Option<DisplayItem> {
    let mut projected = DisplayItem::default();

    if item.is_object() {
        for spec in fields {
            if let Some(text) = resolve_field(item, spec.candidates) {
                projected.insert(spec, text);
            }
        }
    } else if let Some(text) = display_text(item) {
        projected.fields.insert(VALUE_FIELD, text);
    }

    (!projected.is_empty()).then_some(projected)
}

/// Projects one item whose fields may each come from a different object.
/// For every field the `sources` are tried in order, each with the field's full
/// candidate list; non-object sources are skipped.
///
/// Returns the item together with the raw values that supplied it, keyed by
/// field name, or `None` when no field resolves anywhere.
pub fn project_merged(
    sources: &[&Value],
    fields: &[FieldSpec],
) -> Option<(DisplayItem, Map<String, Value>)> {
    let mut projected = DisplayItem::default();
    let mut raw = Map::new();

    for spec in fields {
        let found = sources
            .iter()
            .filter(|source| source.is_object())
            .find_map(|source| find_field(source, spec.candidates));
        if let Some((value, text)) = found {
            raw.insert(spec.name.to_string(), value.clone());
            projected.insert(spec, text);
        }
    }

    (!projected.is_empty()).then_some((projected, raw))
}

/// Projects a resolved section value into display items.
///
/// Arrays project element-wise. An object is one item if any field resolves on
/// it; otherwise, if all its values are scalars or lists of scalars, it is read
/// as a keyed group (`{"backend": [...], "cloud": "AWS"}`) with one
/// `label`/`value` item per entry. Scalars are a single item.
pub fn project_items(data: &Value, fields: &[FieldSpec]) -> Vec<DisplayItem> {
    match data {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| project_item(item, fields))
            .collect(),
        Value::Object(map) => match project_item(data, fields) {
            Some(item) => vec![item],
            None if !map.values().all(is_flat) => Vec::new(),
            None => map
                .iter()
                .filter_map(|(key, value)| {
                    display_text(value).map(|text| {
                        let mut item = DisplayItem::default();
                        item.fields.insert(LABEL_FIELD, key.clone());
                        item.fields.insert(VALUE_FIELD, text);
                        item
                    })
                })
                .collect(),
        },
        other => project_item(other, fields).into_iter().collect(),
    }
}

fn is_flat(value: &Value) -> bool {
    match value {
        Value::Object(_) => false,
        Value::Array(items) => items.iter().all(|v| !v.is_object() && !v.is_array()),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AWARD: &[FieldSpec] = &[
        FieldSpec::new("display_name", &["name", "title"]),
        FieldSpec::new("org", &["issuer", "organization"]),
        FieldSpec::new("date", &["year", "date"]),
    ];

    #[test]
    fn test_fields_fall_back_independently() {
        let item = project_item(
            &json!({"title": "Gold Medal", "issuer": "IOC", "date": "2020"}),
            AWARD,
        )
        .unwrap();
        assert_eq!(item.get("display_name"), Some("Gold Medal"));
        assert_eq!(item.get("org"), Some("IOC"));
        assert_eq!(item.get("date"), Some("2020"));
    }

    #[test]
    fn test_first_candidate_wins_when_both_present() {
        let item = project_item(&json!({"name": "A", "title": "B"}), AWARD).unwrap();
        assert_eq!(item.get("display_name"), Some("A"));
    }

    #[test]
    fn test_blank_candidate_is_skipped() {
        let item = project_item(&json!({"name": "  ", "title": "B", "year": null, "date": 2019}), AWARD).unwrap();
        assert_eq!(item.get("display_name"), Some("B"));
        assert_eq!(item.get("date"), Some("2019"));
    }

    #[test]
    fn test_missing_field_is_absent() {
        let item = project_item(&json!({"name": "Best Paper"}), AWARD).unwrap();
        assert_eq!(item.get("org"), None);
        assert_eq!(item.fields.len(), 1);
    }

    #[test]
    fn test_scalar_item_becomes_value() {
        let item = project_item(&json!("Rust"), AWARD).unwrap();
        assert_eq!(item.get(VALUE_FIELD), Some("Rust"));
    }

    #[test]
    fn test_unresolvable_object_item_is_dropped() {
        assert!(project_item(&json!({"unrelated": 1}), AWARD).is_none());
        assert!(project_item(&json!(null), AWARD).is_none());
    }

    #[test]
    fn test_classified_field_emits_badge() {
        let specs = [FieldSpec::new("employment_type", &["employment_type", "type"])
            .classified(CategoryFamily::EmploymentType)];
        let item = project_item(&json!({"type": "Full Time"}), &specs).unwrap();
        assert_eq!(item.badges.len(), 1);
        assert_eq!(item.badges[0].bucket, Bucket::FullTime);
        assert_eq!(item.badges[0].field, "employment_type");
    }

    #[test]
    fn test_project_items_array() {
        let items = project_items(&json!([{"name": "A"}, {}, "B"]), AWARD);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get(VALUE_FIELD), Some("B"));
    }

    #[test]
    fn test_project_items_keyed_group() {
        let specs = [FieldSpec::new("name", &["name"])];
        let items = project_items(&json!({"backend": ["Rust", "Go"], "cloud": "AWS"}), &specs);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get(LABEL_FIELD), Some("backend"));
        assert_eq!(items[0].get(VALUE_FIELD), Some("Rust, Go"));
        assert_eq!(items[1].get(VALUE_FIELD), Some("AWS"));
    }

    #[test]
    fn test_nested_object_is_not_a_keyed_group() {
        let specs = [FieldSpec::new("email", &["email"])];
        let items = project_items(&json!({"experience": [{"title": "Dev"}]}), &specs);
        assert!(items.is_empty());
    }

    #[test]
    fn test_merged_fields_come_from_first_source_holding_them() {
        let contact = json!({"name": "Ada", "email": "  "});
        let root = json!({"email": "ada@example.com", "name": "Someone Else"});
        let specs = [
            FieldSpec::new("name", &["name"]),
            FieldSpec::new("email", &["email"]),
            FieldSpec::new("phone", &["phone"]),
        ];

        let (item, raw) = project_merged(&[&contact, &root], &specs).unwrap();
        assert_eq!(item.get("name"), Some("Ada"));
        assert_eq!(item.get("email"), Some("ada@example.com"));
        assert_eq!(item.get("phone"), None);
        assert_eq!(raw.get("email"), Some(&json!("ada@example.com")));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_merged_skips_scalar_sources_and_may_find_nothing() {
        let specs = [FieldSpec::new("name", &["name"])];
        assert!(project_merged(&[&json!("Ada"), &json!({"skills": []})], &specs).is_none());
    }

    #[test]
    fn test_project_items_single_object() {
        let items = project_items(&json!({"name": "Ada", "extra": 1}), &[FieldSpec::new("name", &["name"])]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("name"), Some("Ada"));
    }
}
