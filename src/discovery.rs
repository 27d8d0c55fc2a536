//! Path discovery for mapping suggestions
//!
//! Walks one sample document and lists every address a mapping author
//! could bind to, in both dotted and wildcard-indexed JSONPath form.
//! This is a sniffer over a single sample, not schema inference: types
//! are never merged and arrays only contribute the keys of their object
//! elements.

use crate::envelope::ListPage;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const ROOT: &str = "$";

/// Characters that force bracket notation for a key
const BRACKET_CHARS: &[char] = &[':', '.', '-', ' '];

/// Main entry point: enumerate addressable paths in a sample, sorted and
/// deduplicated. The root `$` itself is not included.
pub fn discover_paths(sample: &Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    walk(sample, ROOT, &mut paths);
    paths
}

/// Discover paths on the first record of a list page; an empty page has
/// none.
pub fn discover_list_paths(page: &ListPage) -> BTreeSet<String> {
    page.items.first().map(discover_paths).unwrap_or_default()
}

/// Append `key` to `base`, quoting it when plain dot notation would be
/// ambiguous.
pub fn child_path(base: &str, key: &str) -> String {
    if key.contains(BRACKET_CHARS) {
        format!("{}['{}']", base, key)
    } else {
        format!("{}.{}", base, key)
    }
}

fn walk(value: &Value, path: &str, paths: &mut BTreeSet<String>) {
    if path != ROOT {
        paths.insert(path.to_string());
    }

    match value {
        Value::Object(obj) => walk_object(obj, path, paths),
        Value::Array(arr) => walk_array(arr, path, paths),
        _ => {
            // Scalars end the walk
        }
    }
}

fn walk_object(obj: &Map<String, Value>, path: &str, paths: &mut BTreeSet<String>) {
    for (key, value) in obj.iter() {
        walk(value, &child_path(path, key), paths);
    }
}

/// Union the keys of every object element under a `[*]` wildcard and
/// descend into each element's container values at that key.
fn walk_array(arr: &[Value], path: &str, paths: &mut BTreeSet<String>) {
    let elements: Vec<&Map<String, Value>> = arr.iter().filter_map(Value::as_object).collect();

    let keys: BTreeSet<&String> = elements.iter().flat_map(|obj| obj.keys()).collect();

    let wildcard = format!("{}[*]", path);
    for key in keys {
        let key_path = child_path(&wildcard, key);
        paths.insert(key_path.clone());

        for obj in &elements {
            match obj.get(key.as_str()) {
                Some(nested) if nested.is_object() || nested.is_array() => {
                    walk(nested, &key_path, paths);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_object_and_array_paths() {
        let sample = json!({"a": {"b": 1}, "c": [{"d": 2}]});
        assert_eq!(
            discover_paths(&sample),
            set(&["$.a", "$.a.b", "$.c", "$.c[*].d"])
        );
    }

    #[test]
    fn test_array_key_union() {
        let sample = json!({"rows": [{"x": 1}, {"y": 2}, "scalar", {"x": 3, "z": {"w": true}}]});
        assert_eq!(
            discover_paths(&sample),
            set(&["$.rows", "$.rows[*].x", "$.rows[*].y", "$.rows[*].z", "$.rows[*].z.w"])
        );
    }

    #[test]
    fn test_nested_arrays_recurse_through_elements() {
        let sample = json!({"chartData": [{"points": [{"x": "Jan", "y": 1}]}]});
        assert_eq!(
            discover_paths(&sample),
            set(&[
                "$.chartData",
                "$.chartData[*].points",
                "$.chartData[*].points[*].x",
                "$.chartData[*].points[*].y",
            ])
        );
    }

    #[test]
    fn test_scalar_arrays_add_nothing() {
        let sample = json!({"tags": ["a", "b"], "matrix": [[1, 2]]});
        assert_eq!(discover_paths(&sample), set(&["$.matrix", "$.tags"]));
    }

    #[test]
    fn test_bracket_notation_for_special_keys() {
        let sample = json!({
            "release-date": "2024",
            "a.b": 1,
            "ns:key": {"inner key": 2},
            "plain": [{"x-y": 1}]
        });
        assert_eq!(
            discover_paths(&sample),
            set(&[
                "$['a.b']",
                "$['ns:key']",
                "$['ns:key']['inner key']",
                "$['release-date']",
                "$.plain",
                "$.plain[*]['x-y']",
            ])
        );
    }

    #[test]
    fn test_output_is_sorted() {
        let sample = json!({"z": 1, "a": 2, "m": {"b": 3}});
        let paths: Vec<String> = discover_paths(&sample).into_iter().collect();
        assert_eq!(paths, vec!["$.a", "$.m", "$.m.b", "$.z"]);
    }

    #[test]
    fn test_list_paths_use_first_record() {
        assert!(discover_list_paths(&ListPage::default()).is_empty());
        let page = ListPage {
            items: vec![json!({"id": 1}), json!({"other": 2})],
            total: 2,
        };
        assert_eq!(discover_list_paths(&page), set(&["$.id"]));
    }
}
