use serde_json::{Map, Value};

/// Keys whose value labels an object, in precedence order after the `city`/`country` pair.
const LABEL_KEYS: &[&str] = &["name", "title", "value"];
const PLACE_KEYS: &[&str] = &["city", "country"];

/// Renders any JSON value as a display string. Total: shapes it does not
/// recognise fall back to their compact JSON serialization.
///
/// - strings as-is, numbers and booleans stringified, null as ""
/// - objects: `city`/`country` joined with ", ", else `name`, else `title`, else `value`
/// - arrays: each element rendered, blanks skipped, joined with ", "
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => display_object(map).unwrap_or_else(|| value.to_string()),
    }
}

/// `display_value`, but `None` when the rendering is blank.
pub fn display_text(value: &Value) -> Option<String> {
    let rendered = display_value(value);
    if rendered.trim().is_empty() {
        None
    } else {
        Some(rendered)
    }
}

fn display_object(map: &Map<String, Value>) -> Option<String> {
    let place: Vec<String> = PLACE_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .filter_map(display_text)
        .collect();
    if !place.is_empty() {
        return Some(place.join(", "));
    }

    LABEL_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(display_text)
}
