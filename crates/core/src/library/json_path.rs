//! Optional-path access into untyped JSON.
//!
//! Every accessor returns `None` for a missing key, a non-object along the
//! way, or a value of the wrong type, so callers can fall back to defaults
//! without matching on the document shape.

use serde_json::Value;

/// Walk `path` through nested objects starting at `value`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.as_object()?.get(*key))
}

/// String at `path`, ignoring `null` and non-string values.
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// Boolean at `path`. Accepts JSON booleans and the strings `true`/`false`.
pub fn bool_at(value: &Value, path: &[&str]) -> Option<bool> {
    match lookup(value, path)? {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// String elements of the array at `path`; other elements are skipped.
pub fn strings_at(value: &Value, path: &[&str]) -> Vec<String> {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_follows_nested_objects() {
        let doc = json!({"extra": {"about": {"description": "Long"}}});
        assert_eq!(
            str_at(&doc, &["extra", "about", "description"]),
            Some("Long")
        );
        assert!(lookup(&doc, &["extra", "missing", "description"]).is_none());
    }

    #[test]
    fn lookup_stops_at_non_objects() {
        let doc = json!({"extra": ["about"], "title": null});
        assert!(lookup(&doc, &["extra", "about"]).is_none());
        assert!(str_at(&doc, &["title"]).is_none());
    }

    #[test]
    fn bool_accepts_strings() {
        let doc = json!({"a": true, "b": "False", "c": 1, "d": "yes"});
        assert_eq!(bool_at(&doc, &["a"]), Some(true));
        assert_eq!(bool_at(&doc, &["b"]), Some(false));
        assert_eq!(bool_at(&doc, &["c"]), None);
        assert_eq!(bool_at(&doc, &["d"]), None);
    }

    #[test]
    fn strings_skip_other_elements() {
        let doc = json!({"genres": ["Action", 3, null, "RPG"], "tags": "Action"});
        assert_eq!(strings_at(&doc, &["genres"]), vec!["Action", "RPG"]);
        assert!(strings_at(&doc, &["tags"]).is_empty());
    }
}
