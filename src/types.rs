use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Presentation component a registration renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    #[default]
    Card,
    Video,
    Chart,
}

impl ComponentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Card => "card",
            ComponentType::Video => "video",
            ComponentType::Chart => "chart",
        }
    }
}

impl FromStr for ComponentType {
    type Err = std::convert::Infallible;

    /// Unknown tokens fall back to `Card`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "video" => ComponentType::Video,
            "chart" => ComponentType::Chart,
            _ => ComponentType::Card,
        })
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-authored table from UI attribute to backend key or JSONPath.
///
/// Read-only while mapping runs. Blank entries count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    pub const UI_TITLE: &'static str = "ui_title";
    pub const UI_SUBTITLE: &'static str = "ui_subtitle";
    pub const UI_IMAGE: &'static str = "ui_image";
    pub const UI_ID: &'static str = "ui_id";
    pub const UI_BADGE: &'static str = "ui_badge";
    pub const CHART_DATA: &'static str = "chart_data";
    pub const CHART_X: &'static str = "chart_x";
    pub const CHART_Y: &'static str = "chart_y";

    pub const STANDARD_LIST_KEYS: [&'static str; 5] = [
        Self::UI_TITLE,
        Self::UI_SUBTITLE,
        Self::UI_IMAGE,
        Self::UI_ID,
        Self::UI_BADGE,
    ];
    pub const STANDARD_CHART_KEYS: [&'static str; 3] =
        [Self::CHART_DATA, Self::CHART_X, Self::CHART_Y];
    pub const STANDARD_DETAIL_KEYS: [&'static str; 5] =
        ["title", "content", "mediaUrl", "id", "extendInfo"];

    pub fn new() -> Self {
        FieldMapping::default()
    }

    /// Default list mapping for a component type.
    pub fn default_for(component: ComponentType) -> Self {
        let mut mapping = FieldMapping::new()
            .with(Self::UI_TITLE, "title")
            .with(Self::UI_SUBTITLE, "subtitle")
            .with(Self::UI_IMAGE, "imageUrl")
            .with(Self::UI_ID, "id")
            .with(Self::UI_BADGE, "badge");

        if component == ComponentType::Chart {
            mapping = mapping
                .with(Self::UI_BADGE, "chartType")
                .with(Self::CHART_DATA, "chartData")
                .with(Self::CHART_X, "x")
                .with(Self::CHART_Y, "y");
        }
        mapping
    }

    pub fn with(mut self, attribute: impl Into<String>, path: impl Into<String>) -> Self {
        self.insert(attribute, path);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(attribute.into(), path.into());
    }

    /// The configured entry for `attribute`, trimmed; blank is `None`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.entries
            .get(attribute)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }

    /// The path to resolve for `attribute`, falling back to the attribute
    /// name itself.
    pub fn path_for<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.get(attribute).unwrap_or(attribute)
    }

    /// Every configured backend key or path, trimmed the way resolution
    /// reads it. Blank entries are skipped.
    pub fn backend_keys(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Backend keys that are plain top-level keys rather than JSONPath.
    pub fn plain_backend_keys(&self) -> BTreeSet<&str> {
        self.backend_keys()
            .into_iter()
            .filter(|p| !p.starts_with('$'))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FieldMapping {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A backend record after mapping, independent of backend shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedListItem {
    pub id: String,
    pub ui_title: String,
    pub ui_subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_badge: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Unparsed series container, interpreted by the chart extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Value>,

    /// The originating backend record, verbatim
    pub raw: Value,
}

/// One (label, value) pair of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        SeriesPoint {
            label: label.into(),
            value,
        }
    }
}
