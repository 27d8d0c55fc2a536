use crate::resolve::PathResolver;
use crate::types::{FieldMapping, NormalizedListItem};
use crate::value;
use serde_json::Value;
use tracing::trace;

/// Applies a field mapping to raw backend records
pub struct MappingEngine {
    mapping: FieldMapping,
    resolver: PathResolver,
}

impl MappingEngine {
    pub fn new(mapping: FieldMapping) -> Self {
        MappingEngine {
            mapping,
            resolver: PathResolver::new(),
        }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Map a list payload, one item per record, order preserved.
    pub fn map_list(&self, records: &[Value]) -> Vec<NormalizedListItem> {
        let items: Vec<NormalizedListItem> =
            records.iter().map(|record| self.map_record(record)).collect();
        trace!(count = items.len(), "mapped list records");
        items
    }

    /// Derive a normalized item from one record. Unresolvable fields fall
    /// back to empty strings or `None`.
    pub fn map_record(&self, record: &Value) -> NormalizedListItem {
        NormalizedListItem {
            id: self.resolver.id(record, self.path(FieldMapping::UI_ID)),
            ui_title: self.resolver.string(record, self.path(FieldMapping::UI_TITLE)),
            ui_subtitle: self.resolver.string(record, self.path(FieldMapping::UI_SUBTITLE)),
            ui_image: self.non_empty_scalar(record, FieldMapping::UI_IMAGE),
            ui_badge: self.non_empty_scalar(record, FieldMapping::UI_BADGE),
            chart_type: self
                .text(record, "chart_type")
                .or_else(|| self.text(record, "chartType")),
            period: self.text(record, "period"),
            unit: self.text(record, "unit"),
            chart_data: self
                .lookup(record, FieldMapping::CHART_DATA)
                .or_else(|| self.lookup(record, "chartData"))
                .cloned(),
            raw: record.clone(),
        }
    }

    /// The record's mapped id, or its literal `id` key when the mapped id
    /// comes back empty. Used to pick a sample id for detail requests.
    pub fn sample_id(&self, record: &Value) -> String {
        let mapped = self.resolver.id(record, self.path(FieldMapping::UI_ID));
        if !mapped.is_empty() {
            return mapped;
        }
        self.resolver.id(record, "id")
    }

    fn path<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.mapping.path_for(attribute)
    }

    fn lookup<'a>(&'a self, record: &'a Value, attribute: &'a str) -> Option<&'a Value> {
        self.resolver.resolve(record, self.path(attribute))
    }

    fn text(&self, record: &Value, attribute: &str) -> Option<String> {
        self.lookup(record, attribute)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn non_empty_scalar(&self, record: &Value, attribute: &str) -> Option<String> {
        self.lookup(record, attribute)
            .and_then(value::render_scalar)
            .filter(|s| !s.is_empty())
    }
}

/// Convenience wrapper: map `records` with `mapping` in one call.
pub fn map_list(records: &[Value], mapping: &FieldMapping) -> Vec<NormalizedListItem> {
    MappingEngine::new(mapping.clone()).map_list(records)
}
