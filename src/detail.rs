use crate::resolve::PathResolver;
use crate::types::FieldMapping;
use crate::value::JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Top-level keys that belong to the detail screen's fixed layout and are
/// never repeated in the extend-info panel
const CORE_KEYS: &[&str] = &[
    "id", "title", "content", "mediaUrl", "imageUrl", "subtitle", "badge", "chartData", "chartType",
];

/// Keys shown first in the extend-info panel, in this order
const PREFERRED_EXTEND_KEYS: &[&str] = &[
    "author", "date", "duration", "resolution", "chartType", "period", "category", "unit",
];

/// A decoded detail payload read through a detail field mapping
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    data: JsonValue,
    mapping: FieldMapping,
    resolver: PathResolver,
}

impl DetailRecord {
    pub fn new(data: JsonValue, mapping: FieldMapping) -> Self {
        DetailRecord {
            data,
            mapping,
            resolver: PathResolver::new(),
        }
    }

    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    /// Resolve a detail attribute and render it for display; `""` when the
    /// attribute cannot be resolved.
    pub fn field(&self, attribute: &str) -> String {
        let path = self.mapping.path_for(attribute);
        self.resolver
            .resolve_typed(&self.data, path)
            .map(|v| JsonValue::from(v).as_string())
            .unwrap_or_default()
    }

    pub fn id(&self) -> String {
        self.field("id")
    }

    pub fn title(&self) -> String {
        self.field("title")
    }

    pub fn content(&self) -> String {
        self.field("content")
    }

    pub fn media_url(&self) -> Option<String> {
        Some(self.field("mediaUrl")).filter(|url| !url.is_empty())
    }

    /// Every remaining top-level field, rendered as text.
    ///
    /// Core layout keys and plain backend keys consumed by the mapping are
    /// left out.
    pub fn extend_info(&self) -> BTreeMap<String, String> {
        let JsonValue::Object(obj) = &self.data else {
            return BTreeMap::new();
        };
        let consumed: BTreeSet<&str> = self.mapping.plain_backend_keys();

        obj.iter()
            .filter(|(key, _)| !CORE_KEYS.contains(&key.as_str()) && !consumed.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.as_string()))
            .collect()
    }

    /// Extend info ordered for display: preferred keys first, then the rest
    /// by key. Empty values are skipped.
    pub fn extend_info_display(&self) -> Vec<(String, String)> {
        let mut info = self.extend_info();
        info.retain(|_, value| !value.is_empty());

        let mut ordered: Vec<(String, String)> = PREFERRED_EXTEND_KEYS
            .iter()
            .filter_map(|key| info.remove_entry(*key))
            .collect();
        ordered.extend(info);
        ordered
    }
}
