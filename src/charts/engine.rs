//! Filter/Render Engine
//! Pure recompute step: (table, selection) -> (cases chart, deaths chart).
//!
//! Reads the immutable loaded table and the three current dropdown values,
//! filters to the selected calendar month (and state, unless the sentinel is
//! chosen) and produces the two chart specifications. No shared state is
//! written; identical inputs yield identical specs.

use crate::charts::{AxisRange, ChartSpec, ColorAssignment, Series, SeriesPoint};
use crate::data::{self, CovidData};
use chrono::{Month, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Sentinel dropdown value meaning "do not filter by state".
pub const ALL_STATES: &str = "All states";

/// Fixed headroom added above the largest value in the filtered set. Also
/// the y-axis ceiling when the filtered set is empty.
const Y_MARGIN: f64 = 5.0;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("'{month} {year}' does not name a valid calendar month")]
    InvalidSelection { month: String, year: i32 },
    #[error("Failed to filter dataset: {0}")]
    Filter(#[from] PolarsError),
}

/// Current dropdown values. Owned by the view layer and passed by value into
/// each recompute; resets to the defaults on process restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub state: String,
    pub month: String,
    pub year: i32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            state: ALL_STATES.to_string(),
            month: "January".to_string(),
            year: 2021,
        }
    }
}

/// Recomputes the two chart specifications for a selection.
pub struct ChartEngine;

impl ChartEngine {
    /// Build the cases and deaths charts for the given selection. Both
    /// charts consume the same filtered row set; only the metric column
    /// differs.
    pub fn render(
        data: &CovidData,
        selection: &Selection,
    ) -> Result<(ChartSpec, ChartSpec), EngineError> {
        let (start, end) = month_span(&selection.month, selection.year)?;
        let filtered = Self::filter_rows(data.frame(), &selection.state, start, end)?;

        // Colors come from the global state list, not the filtered subset,
        // and only apply under the sentinel; a named state keeps the
        // renderer's default line color.
        let state_order = data.states();
        let colors = (selection.state == ALL_STATES).then(|| ColorAssignment::new(&state_order));

        let cases = Self::metric_chart(
            &filtered,
            &state_order,
            data::CASES_COL,
            "Cases",
            selection,
            colors.as_ref(),
        )?;
        let deaths = Self::metric_chart(
            &filtered,
            &state_order,
            data::DEATHS_COL,
            "Deaths",
            selection,
            colors.as_ref(),
        )?;

        Ok((cases, deaths))
    }

    /// One filter applied once: date within the closed month interval, plus
    /// the state predicate unless the sentinel is selected.
    fn filter_rows(
        df: &DataFrame,
        state: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame, EngineError> {
        let in_month = col(data::DATE_COL)
            .gt_eq(lit(start))
            .and(col(data::DATE_COL).lt_eq(lit(end)));
        let predicate = if state == ALL_STATES {
            in_month
        } else {
            in_month.and(col(data::STATE_COL).eq(lit(state.to_string())))
        };

        Ok(df.clone().lazy().filter(predicate).collect()?)
    }

    fn metric_chart(
        filtered: &DataFrame,
        state_order: &[String],
        metric_col: &str,
        metric_label: &str,
        selection: &Selection,
        colors: Option<&ColorAssignment>,
    ) -> Result<ChartSpec, EngineError> {
        let series = Self::series_by_state(filtered, state_order, metric_col, colors)?;

        let metric_f64 = filtered.column(metric_col)?.cast(&DataType::Float64)?;
        let y_max = metric_f64.f64()?.max();

        let state_label = if selection.state == ALL_STATES {
            "All States"
        } else {
            selection.state.as_str()
        };

        Ok(ChartSpec {
            title: format!(
                "COVID-19 {} in {} {} - {}",
                metric_label, selection.month, selection.year, state_label
            ),
            x_label: "Date".to_string(),
            y_label: metric_label.to_string(),
            y_range: AxisRange {
                min: 0.0,
                max: y_max.map_or(Y_MARGIN, |max| max + Y_MARGIN),
            },
            series,
        })
    }

    /// Group the filtered rows into one line per state, emitted in global
    /// first-appearance order with points sorted by date.
    fn series_by_state(
        filtered: &DataFrame,
        state_order: &[String],
        metric_col: &str,
        colors: Option<&ColorAssignment>,
    ) -> Result<Vec<Series>, EngineError> {
        let state_col = filtered.column(data::STATE_COL)?;
        let states = state_col.str()?;
        let date_days = filtered.column(data::DATE_COL)?.cast(&DataType::Int32)?;
        let days = date_days.i32()?;
        let metric_f64 = filtered.column(metric_col)?.cast(&DataType::Float64)?;
        let values = metric_f64.f64()?;

        let mut points_by_state: HashMap<&str, Vec<SeriesPoint>> = HashMap::new();
        for i in 0..filtered.height() {
            let (Some(state), Some(day), Some(value)) = (states.get(i), days.get(i), values.get(i))
            else {
                continue;
            };
            let Some(date) = data::date_from_epoch_days(day) else {
                continue;
            };
            points_by_state
                .entry(state)
                .or_default()
                .push(SeriesPoint { date, value });
        }

        let mut series = Vec::new();
        for state in state_order {
            if let Some(mut points) = points_by_state.remove(state.as_str()) {
                points.sort_by_key(|p| p.date);
                series.push(Series {
                    name: state.clone(),
                    color: colors.and_then(|c| c.get(state)),
                    points,
                });
            }
        }

        Ok(series)
    }
}

/// Closed [first day, last day] interval of the selected calendar month.
fn month_span(month: &str, year: i32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let invalid = || EngineError::InvalidSelection {
        month: month.to_string(),
        year,
    };

    let parsed: Month = month.parse().map_err(|_| invalid())?;
    let number = parsed.number_from_month();

    let start = NaiveDate::from_ymd_opt(year, number, 1).ok_or_else(invalid)?;
    let next_month = if number == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, number + 1, 1)
    };
    let end = next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const FIXTURE: &str = "\
date,state,fips,cases,deaths
2020-02-29,Washington,53,1,0
2020-03-01,Washington,53,10,1
2020-03-31,Washington,53,120,8
2020-03-05,California,06,5,0
2020-03-15,California,06,50,3
2020-04-01,California,06,90,6
2021-01-05,California,06,900,20
2021-01-10,Texas,48,700,10
2021-01-20,Texas,48,950,15
";

    fn data() -> CovidData {
        CovidData::from_csv(FIXTURE).unwrap()
    }

    fn selection(state: &str, month: &str, year: i32) -> Selection {
        Selection {
            state: state.to_string(),
            month: month.to_string(),
            year,
        }
    }

    #[test]
    fn test_month_span_closed_interval() {
        let (start, end) = month_span("January", 2021).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 1, 31).unwrap());

        let (start, end) = month_span("February", 2020).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());

        let (_, end) = month_span("December", 2021).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[test]
    fn test_malformed_month_is_invalid_selection() {
        assert!(matches!(
            month_span("Janruary", 2021),
            Err(EngineError::InvalidSelection { .. })
        ));
        assert!(matches!(
            ChartEngine::render(&data(), &selection(ALL_STATES, "Smarch", 2021)),
            Err(EngineError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_all_states_filters_to_month_across_states() {
        let (cases, deaths) = ChartEngine::render(&data(), &selection(ALL_STATES, "March", 2020))
            .unwrap();

        // One line per state present in March 2020, in global order.
        let names: Vec<&str> = cases.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Washington", "California"]);

        let span = (
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 31).unwrap(),
        );
        for chart in [&cases, &deaths] {
            for series in &chart.series {
                assert!(!series.points.is_empty());
                for point in &series.points {
                    assert!(point.date >= span.0 && point.date <= span.1);
                }
            }
        }

        // Max cases in March 2020 is 120, plus the fixed margin.
        assert_eq!(cases.y_range.min, 0.0);
        assert_eq!(cases.y_range.max, 125.0);
        assert_eq!(deaths.y_range.max, 13.0);
    }

    #[test]
    fn test_single_state_yields_one_uncolored_line() {
        let (cases, deaths) =
            ChartEngine::render(&data(), &selection("California", "March", 2020)).unwrap();

        for chart in [&cases, &deaths] {
            assert_eq!(chart.series.len(), 1);
            let series = &chart.series[0];
            assert_eq!(series.name, "California");
            // The palette override only applies under the sentinel.
            assert_eq!(series.color, None);
            for point in &series.points {
                assert_eq!(point.date.month(), 3);
                assert_eq!(point.date.year(), 2020);
            }
        }
        assert_eq!(cases.series[0].points.len(), 2);
        assert_eq!(cases.y_range.max, 55.0);
    }

    #[test]
    fn test_points_sorted_by_date() {
        let (cases, _) =
            ChartEngine::render(&data(), &selection(ALL_STATES, "March", 2020)).unwrap();
        for series in &cases.series {
            for pair in series.points.windows(2) {
                assert!(pair[0].date <= pair[1].date);
            }
        }
    }

    #[test]
    fn test_empty_result_degrades_to_floor_range() {
        let (cases, deaths) =
            ChartEngine::render(&data(), &selection("Texas", "February", 2022)).unwrap();

        assert!(cases.series.is_empty());
        assert!(deaths.series.is_empty());
        assert_eq!(cases.y_range, AxisRange { min: 0.0, max: 5.0 });
        assert_eq!(deaths.y_range, AxisRange { min: 0.0, max: 5.0 });
    }

    #[test]
    fn test_sentinel_colors_are_stable_across_selections() {
        let data = data();
        let (march, _) =
            ChartEngine::render(&data, &selection(ALL_STATES, "March", 2020)).unwrap();
        let (january, january_deaths) =
            ChartEngine::render(&data, &selection(ALL_STATES, "January", 2021)).unwrap();

        let color_of = |chart: &ChartSpec, name: &str| {
            chart
                .series
                .iter()
                .find(|s| s.name == name)
                .and_then(|s| s.color)
        };

        // California keeps its color whether or not Washington shrinks out
        // of the result set, and across both charts.
        let march_color = color_of(&march, "California").unwrap();
        assert_eq!(color_of(&january, "California"), Some(march_color));
        assert_eq!(color_of(&january_deaths, "California"), Some(march_color));
        assert_ne!(color_of(&march, "Washington"), Some(march_color));
    }

    #[test]
    fn test_render_is_idempotent() {
        let data = data();
        let selection = selection(ALL_STATES, "January", 2021);
        let first = ChartEngine::render(&data, &selection).unwrap();
        let second = ChartEngine::render(&data, &selection).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_titles_interpolate_selection() {
        let (cases, deaths) =
            ChartEngine::render(&data(), &selection(ALL_STATES, "January", 2021)).unwrap();
        assert_eq!(cases.title, "COVID-19 Cases in January 2021 - All States");
        assert_eq!(deaths.title, "COVID-19 Deaths in January 2021 - All States");

        let (cases, _) =
            ChartEngine::render(&data(), &selection("California", "March", 2020)).unwrap();
        assert_eq!(cases.title, "COVID-19 Cases in March 2020 - California");
    }
}
