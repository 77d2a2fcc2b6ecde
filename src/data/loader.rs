//! Dataset Loader Module
//! Downloads the US-states CSV and parses it into an immutable Polars table.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use thiserror::Error;

/// NYT cumulative cases/deaths time series, one row per state per day.
pub const DATA_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";

pub const DATE_COL: &str = "date";
pub const STATE_COL: &str = "state";
pub const CASES_COL: &str = "cases";
pub const DEATHS_COL: &str = "deaths";

/// Columns the dashboard requires; the source's `fips` column is ignored.
const REQUIRED_COLS: [&str; 4] = [DATE_COL, STATE_COL, CASES_COL, DEATHS_COL];

/// Polars stores `Date` values as days since the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to download dataset: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("Dataset contains no rows")]
    Empty,
}

/// Downloads the dataset once at startup.
pub struct DataLoader;

impl DataLoader {
    /// Fetch the CSV over HTTPS and parse it. Any failure here is fatal to
    /// startup; the dashboard never runs without data.
    pub async fn fetch(url: &str) -> Result<CovidData, LoaderError> {
        let body = reqwest::get(url).await?.error_for_status()?.text().await?;
        CovidData::from_csv(&body)
    }
}

/// The loaded observation table. Constructed once, shared read-only for the
/// process lifetime; no component mutates it after load.
pub struct CovidData {
    df: DataFrame,
}

impl CovidData {
    /// Parse CSV text into the normalized table: header row, inferred
    /// schema, and the `date` column converted from `%Y-%m-%d` strings to a
    /// proper `Date` dtype so downstream filters compare calendar dates.
    pub fn from_csv(csv: &str) -> Result<Self, LoaderError> {
        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(10_000))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(csv.as_bytes()))
            .finish()?;

        for required in REQUIRED_COLS {
            if !df.get_column_names().iter().any(|c| c.as_str() == required) {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        let df = df
            .lazy()
            .with_column(col(DATE_COL).str().to_date(StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                strict: false,
                ..Default::default()
            }))
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::Empty);
        }

        Ok(Self { df })
    }

    /// Get a reference to the loaded DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Get the number of observation rows.
    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct state names in first-appearance order. Chart colors are
    /// assigned by position in this list, so the order must not depend on
    /// any filtered subset.
    pub fn states(&self) -> Vec<String> {
        let Ok(states) = self.df.column(STATE_COL).and_then(|c| c.str()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for state in states.into_iter().flatten() {
            if seen.insert(state) {
                out.push(state.to_string());
            }
        }
        out
    }

    /// Distinct English month names present in the data, in first-appearance
    /// order. Populates the month dropdown.
    pub fn month_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for date in self.dates() {
            if seen.insert(date.month()) {
                out.push(date.format("%B").to_string());
            }
        }
        out
    }

    /// Distinct years present in the data, in first-appearance order.
    pub fn years(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for date in self.dates() {
            if seen.insert(date.year()) {
                out.push(date.year());
            }
        }
        out
    }

    fn dates(&self) -> Vec<NaiveDate> {
        let Ok(days) = self
            .df
            .column(DATE_COL)
            .and_then(|c| c.cast(&DataType::Int32))
        else {
            return Vec::new();
        };
        let Ok(days) = days.i32() else {
            return Vec::new();
        };

        days.into_iter()
            .flatten()
            .filter_map(date_from_epoch_days)
            .collect()
    }
}
