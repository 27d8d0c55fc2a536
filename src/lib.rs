//! # mbox-mapper - Dynamic JSON Field Mapping
//!
//! Turns arbitrary REST list/detail payloads into normalized records for
//! card, video and chart components, driven by a user-authored field
//! mapping instead of per-API code.
//!
//! ## Modules
//!
//! - **value**: typed JSON model and the shared string/number/id coercions
//! - **resolve**: plain-key and JSONPath resolution of mapping entries
//! - **discovery**: path suggestions from a sample record
//! - **mapping**: raw records + mapping -> normalized list items
//! - **chart**: chart kind and (label, value) series recovery
//! - **detail** / **envelope**: detail payload access and response unwrapping
//!
//! Resolution, mapping and chart extraction never fail. A missing field,
//! a malformed JSONPath or a payload with no numbers degrades to an empty
//! value, so a misconfigured mapping shows up as blank fields rather than
//! an error.
//!
//! ## Quick Start
//!
//! ### Mapping a list
//!
//! ```rust
//! use mbox_mapper::{FieldMapping, MappingEngine};
//! use serde_json::json;
//!
//! let mapping = FieldMapping::new()
//!     .with("ui_title", "$.info.name")
//!     .with("ui_id", "uid");
//!
//! let records = vec![json!({"uid": 7, "info": {"name": "Alice"}})];
//! let items = MappingEngine::new(mapping).map_list(&records);
//!
//! assert_eq!(items[0].id, "7");
//! assert_eq!(items[0].ui_title, "Alice");
//! ```
//!
//! ### Chart series
//!
//! ```rust
//! use mbox_mapper::{chart::ChartView, map_list, ComponentType, FieldMapping};
//! use serde_json::json;
//!
//! let mapping = FieldMapping::default_for(ComponentType::Chart);
//! let records = vec![json!({"id": 1, "chartType": "trend", "pv": 12, "uv": 3})];
//!
//! let items = map_list(&records, &mapping);
//! let view = ChartView::from_item(&items[0], &mapping);
//!
//! assert_eq!(view.kind.as_str(), "line");
//! assert_eq!(view.series.len(), 2);
//! ```
//!
//! ### Path suggestions
//!
//! ```rust
//! use mbox_mapper::discover_paths;
//! use serde_json::json;
//!
//! let paths = discover_paths(&json!({"a": {"b": 1}, "c": [{"d": 2}]}));
//! assert_eq!(paths.into_iter().collect::<Vec<_>>(), ["$.a", "$.a.b", "$.c", "$.c[*].d"]);
//! ```

use serde_json::Value;

pub mod chart;
pub mod detail;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod mapping;
pub mod resolve;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use chart::{extract_series, ChartKind, ChartView};
pub use detail::DetailRecord;
pub use discovery::discover_paths;
pub use envelope::ListPage;
pub use error::{MapperError, Result};
pub use mapping::{map_list, MappingEngine};
pub use resolve::PathResolver;
pub use types::{ComponentType, FieldMapping, NormalizedListItem, SeriesPoint};
pub use value::JsonValue;

/// Main entry point: decode a list response and map every record
pub fn map_list_response(bytes: &[u8], mapping: &FieldMapping) -> Result<Vec<NormalizedListItem>> {
    let page = ListPage::parse(bytes)?;
    Ok(map_list(&page.items, mapping))
}

/// Resolve a single mapping entry against a native value, rendered as text.
pub fn resolve_string(root: &Value, path: &str) -> String {
    PathResolver::new().string(root, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_list_response() {
        let body = br#"{
            "code": 200,
            "data": {
                "list": [
                    {"id": 1, "title": "First", "imageUrl": "https://img/1"},
                    {"id": 2, "title": "Second", "imageUrl": ""}
                ],
                "total": 2
            }
        }"#;

        let items = map_list_response(body, &FieldMapping::default_for(ComponentType::Video)).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ui_title, "First");
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].ui_image, None);
    }

    #[test]
    fn test_resolve_string() {
        let root = json!({"n": 42.0, "nested": {"k": "v"}});
        assert_eq!(resolve_string(&root, "n"), "42");
        assert_eq!(resolve_string(&root, "$.nested.k"), "v");
        assert_eq!(resolve_string(&root, "$[unterminated"), "");
    }
}
