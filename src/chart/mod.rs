//! Chart data extraction
//!
//! Turns a mapped list item into something a chart component can draw:
//! a normalized chart kind plus a (label, value) series, recovered
//! heuristically when the mapping does not pin the series down.

pub mod kind;
pub mod series;

pub use kind::{chart_type_token, ChartKind};
pub use series::{extract_series, ChartKeys, SeriesExtractor};

use crate::types::{FieldMapping, NormalizedListItem, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Everything a chart card needs to render one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub kind: ChartKind,
    pub series: Vec<SeriesPoint>,
}

impl ChartView {
    pub fn from_item(item: &NormalizedListItem, mapping: &FieldMapping) -> Self {
        ChartView {
            kind: ChartKind::for_item(item),
            series: extract_series(item, mapping),
        }
    }

    /// No numeric rows were found; show the empty state.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
