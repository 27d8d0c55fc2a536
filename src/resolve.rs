//! Path resolution for field mappings
//!
//! A mapping entry is either a plain top-level key or a JSONPath
//! expression starting with `$`. Resolution never fails: a malformed
//! expression, a missing key or a non-object root all come back as `None`.

use crate::value::{self, JsonValue};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Slice selectors with a zero step, e.g. `[0:3:0]` or `[::0]`. The engine
/// cannot iterate these, so they are rejected before it sees them.
static ZERO_STEP_SLICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[[^\]'"]*:[^\]'"]*:\s*[+-]?0+\s*\]"#).unwrap()
});

const ZERO_STEP_MESSAGE: &str = "slice step cannot be zero";

/// Stateless resolver; construct freely, share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        PathResolver
    }

    pub fn is_json_path(path: &str) -> bool {
        path.starts_with('$')
    }

    /// Resolve `path` against `root`.
    ///
    /// JSONPath queries collapse to the first non-null match in document
    /// order. Plain keys are looked up directly on the root object with no
    /// traversal. A JSON null is reported as absent in both cases.
    pub fn resolve<'a>(&self, root: &'a Value, path: &'a str) -> Option<&'a Value> {
        if Self::is_json_path(path) {
            if ZERO_STEP_SLICE.is_match(path) {
                debug!(path, error = ZERO_STEP_MESSAGE, "rejected JSONPath expression");
                return None;
            }
            match jsonpath_lib::select(root, path) {
                Ok(matches) => matches.into_iter().find(|v| !v.is_null()),
                Err(e) => {
                    debug!(path, error = %e, "rejected JSONPath expression");
                    None
                }
            }
        } else {
            root.as_object()
                .and_then(|obj| obj.get(path))
                .filter(|v| !v.is_null())
        }
    }

    /// Resolve against a typed document; the result is in native form.
    pub fn resolve_typed(&self, root: &JsonValue, path: &str) -> Option<Value> {
        if Self::is_json_path(path) {
            let native = root.to_native();
            self.resolve(&native, path).cloned()
        } else {
            root.get(path)
                .filter(|v| !v.is_null())
                .map(JsonValue::to_native)
        }
    }

    /// Resolve and render as a display string; absent resolves to `""`.
    pub fn string(&self, root: &Value, path: &str) -> String {
        self.resolve(root, path).map(value::render).unwrap_or_default()
    }

    /// Resolve a numeric value or numeric-looking string.
    pub fn number(&self, root: &Value, path: &str) -> Option<f64> {
        self.resolve(root, path).and_then(value::number)
    }

    /// Resolve an identifier: a string or an integer-like number.
    pub fn id(&self, root: &Value, path: &str) -> String {
        self.resolve(root, path)
            .and_then(value::id_string)
            .unwrap_or_default()
    }

    /// Check a mapping entry before it is saved.
    ///
    /// Returns the engine's complaint for a JSONPath it cannot compile.
    /// Plain keys are always accepted.
    pub fn validate(&self, path: &str) -> Option<String> {
        if !Self::is_json_path(path) {
            return None;
        }
        if ZERO_STEP_SLICE.is_match(path) {
            return Some(ZERO_STEP_MESSAGE.to_string());
        }
        jsonpath_lib::select(&Value::Object(Default::default()), path)
            .err()
            .map(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_key_is_top_level_only() {
        let root = json!({"title": "Hello", "meta": {"title": "inner"}});
        let resolver = PathResolver::new();

        assert_eq!(resolver.resolve(&root, "title"), Some(&json!("Hello")));
        assert_eq!(resolver.resolve(&root, "meta.title"), None);
        assert_eq!(resolver.resolve(&root, "missing"), None);
        assert_eq!(resolver.resolve(&json!([1, 2]), "title"), None);
    }

    #[test]
    fn test_json_path_first_match_wins() {
        let root = json!({"list": [{"name": "a"}, {"name": "b"}]});
        let resolver = PathResolver::new();

        assert_eq!(resolver.resolve(&root, "$.list[*].name"), Some(&json!("a")));
        assert_eq!(resolver.string(&root, "$.list[1].name"), "b");
    }

    #[test]
    fn test_json_path_skips_null() {
        let root = json!({"a": null, "list": [{"v": null}, {"v": 3}]});
        let resolver = PathResolver::new();

        assert_eq!(resolver.resolve(&root, "$.a"), None);
        assert_eq!(resolver.resolve(&root, "$.list[*].v"), Some(&json!(3)));
        assert_eq!(resolver.resolve(&root, "a"), None);
    }

    #[test]
    fn test_bracket_quoted_key() {
        let root = json!({"release-date": "2024-01-01", "a b": {"c": 1}});
        let resolver = PathResolver::new();

        assert_eq!(resolver.string(&root, "$['release-date']"), "2024-01-01");
        assert_eq!(resolver.string(&root, "$['a b'].c"), "1");
    }

    #[test]
    fn test_malformed_path_yields_none() {
        let root = json!({"a": 1});
        let resolver = PathResolver::new();

        assert_eq!(resolver.resolve(&root, "$[unterminated"), None);
        assert_eq!(resolver.string(&root, "$[unterminated"), "");
        assert!(resolver.validate("$[unterminated").is_some());
        assert!(resolver.validate("$.a.b").is_none());
        assert!(resolver.validate("plain_key").is_none());
    }

    #[test]
    fn test_zero_step_slices_are_rejected() {
        let root = json!({"a": {"b": [1, 2, 3]}});
        let resolver = PathResolver::new();

        for path in ["$.a.b[0:3:0]", "$.a.b[::0]", "$.a.b[1:2: 00 ]"] {
            assert_eq!(resolver.resolve(&root, path), None, "{}", path);
            assert_eq!(resolver.validate(path).as_deref(), Some(ZERO_STEP_MESSAGE));
        }

        assert_eq!(resolver.resolve(&root, "$.a.b[1:0]"), None);
        assert_eq!(resolver.resolve(&root, "$.a.b[0:3:2]"), Some(&json!(1)));
        assert_eq!(resolver.resolve(&json!({"k:1:0": 5}), "$['k:1:0']"), Some(&json!(5)));
    }

    #[test]
    fn test_malformed_and_edge_paths_never_panic() {
        let root = json!({"a": {"b": [1, 2, 3], "c": {"d": null}}, "e": "x"});
        let resolver = PathResolver::new();
        let paths = [
            "$",
            "$$",
            "$.",
            "$..",
            "$..*",
            "$[",
            "$[unterminated",
            "$['a'",
            "$[?(@.a",
            "$[?(@.a == )]",
            "$.a.b[",
            "$.a.b[-1]",
            "$.a.b[5]",
            "$.a.b[1:0]",
            "$.a.b[0:3:0]",
            "$.a.b[::0]",
            "$.a.b[*",
            "$.a.*.d",
            "$..d",
            "$.e.f",
            "$[*][*][*]",
            "$.a.b[?(@ > 1)]",
        ];

        for path in paths {
            let resolved = resolver.resolve(&root, path);
            assert!(resolved.map_or(true, |v| !v.is_null()), "{}", path);
            let _ = resolver.validate(path);
            let _ = resolver.string(&root, path);
        }
    }

    #[test]
    fn test_scalar_rendering_matches_source() {
        let root = json!({"count": 42.0, "ratio": 0.5, "flag": true});
        let resolver = PathResolver::new();

        assert_eq!(resolver.string(&root, "$.count"), "42");
        assert_eq!(resolver.string(&root, "count"), "42");
        assert_eq!(resolver.string(&root, "ratio"), "0.5");
        assert_eq!(resolver.string(&root, "flag"), "true");
    }

    #[test]
    fn test_typed_coercions() {
        let root = json!({"id": 9, "price": " 19.90 ", "bad": {"x": 1}});
        let resolver = PathResolver::new();

        assert_eq!(resolver.id(&root, "id"), "9");
        assert_eq!(resolver.number(&root, "price"), Some(19.9));
        assert_eq!(resolver.number(&root, "bad"), None);
        assert_eq!(resolver.id(&root, "bad"), "");
    }

    #[test]
    fn test_resolve_typed_document() {
        let doc = JsonValue::from(json!({"data": {"title": "T"}, "n": 1}));
        let resolver = PathResolver::new();

        assert_eq!(resolver.resolve_typed(&doc, "$.data.title"), Some(json!("T")));
        assert_eq!(resolver.resolve_typed(&doc, "n"), Some(json!(1)));
        assert_eq!(resolver.resolve_typed(&doc, "data.title"), None);
    }
}
