//! Chart Specification Types
//! Renderer-independent description of a line chart, serialized to the page.

use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive y-axis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// One (date, value) sample on a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A single line: one state's metric over the selected month, points sorted
/// by date. `color` is set only when the stable palette override applies;
/// otherwise the renderer picks its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub points: Vec<SeriesPoint>,
}

/// Complete specification for one chart slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_range: AxisRange,
    pub series: Vec<Series>,
}
