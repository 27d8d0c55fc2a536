use crate::types::NormalizedListItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const LINE_SYNONYMS: &[&str] = &["line", "折线", "折线图", "linechart", "trend"];
const PIE_SYNONYMS: &[&str] = &["pie", "饼图", "环形图", "donut", "doughnut"];

/// Chart rendering style understood by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Pie,
    #[default]
    Bar,
}

impl ChartKind {
    /// Map a raw chart-type token onto a kind. Unrecognised and empty
    /// tokens are bars.
    pub fn normalize(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        if LINE_SYNONYMS.contains(&token.as_str()) {
            ChartKind::Line
        } else if PIE_SYNONYMS.contains(&token.as_str()) {
            ChartKind::Pie
        } else {
            ChartKind::Bar
        }
    }

    /// Resolve and normalize the chart type of a mapped item.
    pub fn for_item(item: &NormalizedListItem) -> Self {
        Self::normalize(&chart_type_token(item))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw chart-type token of an item: its badge, then `chartType` and
/// `type` on the record, then `chartType` inside `extendInfo` (object or
/// JSON-encoded string). Empty when none is set.
pub fn chart_type_token(item: &NormalizedListItem) -> String {
    if let Some(badge) = item.ui_badge.as_deref().filter(|b| !b.is_empty()) {
        return badge.to_string();
    }

    let raw = &item.raw;
    let from_extend_info = || match raw.get("extendInfo") {
        Some(Value::Object(info)) => non_empty(info.get("chartType")),
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|decoded| non_empty(decoded.get("chartType"))),
        _ => None,
    };

    non_empty(raw.get("chartType"))
        .or_else(|| non_empty(raw.get("type")))
        .or_else(from_extend_info)
        .unwrap_or_default()
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
