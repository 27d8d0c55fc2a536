//! Series extraction from weakly-typed chart payloads
//!
//! Backends ship chart data in many shapes: arrays of row objects, arrays
//! of `[label, value]` pairs, objects wrapping a series under some
//! conventional key, flat `{label: number}` maps, or any of those encoded
//! as a JSON string. The heuristics below are ordered key lists consumed by
//! a single first-match helper, so each list can be tuned on its own.

use crate::types::{FieldMapping, NormalizedListItem, SeriesPoint};
use crate::value;
use serde_json::{Map, Value};
use tracing::trace;

/// Fallback label keys, tried after a configured `chart_x`
pub const LABEL_KEYS: &[&str] = &[
    "label", "name", "x", "key", "date", "month", "time", "category", "dimension",
];

/// Fallback value keys, tried after a configured `chart_y`
pub const VALUE_KEYS: &[&str] = &["value", "y", "count", "amount", "num", "total", "score"];

/// Keys that conventionally wrap a nested series, tried after a configured
/// `chart_data`
pub const SERIES_CONTAINER_KEYS: &[&str] = &[
    "chartData", "data", "series", "points", "values", "items", "rows", "dataset",
];

/// Record keys never offered to the numeric-field fallback
pub const RESERVED_KEYS: &[&str] = &[
    "id", "title", "subtitle", "name", "summary", "imageUrl", "badge", "chartType", "extendInfo",
];

const EXTEND_INFO: &str = "extendInfo";
const DEFAULT_LABEL: &str = "item";

/// The chart entries of a field mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartKeys {
    pub data: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl ChartKeys {
    pub fn from_mapping(mapping: &FieldMapping) -> Self {
        ChartKeys {
            data: mapping.get(FieldMapping::CHART_DATA).map(str::to_string),
            x: mapping.get(FieldMapping::CHART_X).map(str::to_string),
            y: mapping.get(FieldMapping::CHART_Y).map(str::to_string),
        }
    }

    fn label_keys(&self) -> impl Iterator<Item = &str> {
        self.x.as_deref().into_iter().chain(LABEL_KEYS.iter().copied())
    }

    fn value_keys(&self) -> impl Iterator<Item = &str> {
        self.y.as_deref().into_iter().chain(VALUE_KEYS.iter().copied())
    }

    fn container_keys(&self) -> impl Iterator<Item = &str> {
        self.data
            .as_deref()
            .into_iter()
            .chain(SERIES_CONTAINER_KEYS.iter().copied())
    }
}

/// Extracts a (label, value) series from a mapped list item
pub struct SeriesExtractor<'m> {
    mapping: &'m FieldMapping,
    keys: ChartKeys,
}

impl<'m> SeriesExtractor<'m> {
    pub fn new(mapping: &'m FieldMapping) -> Self {
        SeriesExtractor {
            mapping,
            keys: ChartKeys::from_mapping(mapping),
        }
    }

    /// Run every stage in order and keep the first non-empty series.
    ///
    /// Stages: the value the mapping engine already resolved for
    /// `chart_data`, the configured key in the record and in its
    /// `extendInfo`, the record itself, `extendInfo` as a whole, and
    /// finally a scan of the record's loose numeric fields. An empty
    /// result means nothing numeric was found anywhere.
    pub fn extract(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        let stages: [(&str, fn(&Self, &NormalizedListItem) -> Vec<SeriesPoint>); 5] = [
            ("mapped", Self::from_mapped_value),
            ("configured", Self::from_configured_key),
            ("record", Self::from_record),
            ("extend_info", Self::from_extend_info),
            ("numeric_fields", Self::from_numeric_fields),
        ];

        for (stage, run) in stages {
            let rows = run(self, item);
            if !rows.is_empty() {
                trace!(stage, rows = rows.len(), "chart series resolved");
                return rows;
            }
        }
        Vec::new()
    }

    /// Parse any candidate container into rows.
    pub fn parse(&self, candidate: &Value) -> Vec<SeriesPoint> {
        self.parse_container(candidate, true)
    }

    fn from_mapped_value(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        item.chart_data
            .as_ref()
            .map(|data| self.parse(data))
            .unwrap_or_default()
    }

    fn from_configured_key(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        let Some(data_key) = self.keys.data.as_deref() else {
            return Vec::new();
        };

        let direct = item.raw.get(data_key).map(|v| self.parse(v)).unwrap_or_default();
        if !direct.is_empty() {
            return direct;
        }

        item.raw
            .get(EXTEND_INFO)
            .and_then(Value::as_object)
            .and_then(|info| info.get(data_key))
            .map(|v| self.parse(v))
            .unwrap_or_default()
    }

    fn from_record(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        self.parse_container(&item.raw, false)
    }

    fn from_extend_info(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        item.raw
            .get(EXTEND_INFO)
            .map(|info| self.parse(info))
            .unwrap_or_default()
    }

    /// `flat` allows an object to be read as a `{label: number}` map when
    /// no nested series is found. It is off for the record itself, whose
    /// loose numeric fields are handled by the filtered fallback instead.
    fn parse_container(&self, candidate: &Value, flat: bool) -> Vec<SeriesPoint> {
        match candidate {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                // A bare string that decodes to itself would loop
                Ok(Value::String(_)) | Err(_) => Vec::new(),
                Ok(decoded) => self.parse_container(&decoded, flat),
            },
            Value::Array(items) => self.parse_rows(items),
            Value::Object(obj) => {
                let nested = self
                    .keys
                    .container_keys()
                    .filter_map(|key| obj.get(key))
                    .map(|value| self.parse(value))
                    .find(|rows| !rows.is_empty());

                match nested {
                    Some(rows) => rows,
                    None if flat => flat_numeric_rows(obj.iter()),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn parse_rows(&self, items: &[Value]) -> Vec<SeriesPoint> {
        items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => self.object_to_row(obj),
                Value::Array(pair) if pair.len() >= 2 => {
                    value::number(&pair[1]).map(|v| SeriesPoint::new(value::render(&pair[0]), v))
                }
                _ => None,
            })
            .collect()
    }

    /// Label: configured `chart_x`, the known label keys, the first
    /// non-empty string field, then `"item"`. Value: configured `chart_y`,
    /// the known value keys, then the first numeric field. No value means
    /// no row.
    fn object_to_row(&self, obj: &Map<String, Value>) -> Option<SeriesPoint> {
        let amount = first_match(obj, self.keys.value_keys(), value::number)
            .or_else(|| obj.values().find_map(value::number))?;

        let label = first_match(obj, self.keys.label_keys(), non_empty_str)
            .or_else(|| obj.values().find_map(non_empty_str))
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());

        Some(SeriesPoint::new(label, amount))
    }

    fn from_numeric_fields(&self, item: &NormalizedListItem) -> Vec<SeriesPoint> {
        let Some(obj) = item.raw.as_object() else {
            return Vec::new();
        };
        let consumed = self.mapping.backend_keys();

        flat_numeric_rows(obj.iter().filter(|(key, _)| {
            !consumed.contains(key.as_str()) && !RESERVED_KEYS.contains(&key.as_str())
        }))
    }
}

/// Convenience wrapper: extract the series of `item` under `mapping`.
pub fn extract_series(item: &NormalizedListItem, mapping: &FieldMapping) -> Vec<SeriesPoint> {
    SeriesExtractor::new(mapping).extract(item)
}

/// First key, in priority order, whose value passes `accept`.
fn first_match<'k, T>(
    obj: &Map<String, Value>,
    keys: impl IntoIterator<Item = &'k str>,
    accept: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.into_iter()
        .filter_map(|key| obj.get(key))
        .find_map(accept)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn flat_numeric_rows<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> Vec<SeriesPoint> {
    let mut rows: Vec<SeriesPoint> = entries
        .filter_map(|(key, v)| value::number(v).map(|n| SeriesPoint::new(key.as_str(), n)))
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    rows
}
