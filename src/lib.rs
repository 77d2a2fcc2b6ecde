//! Covidash - COVID-19 CSV Data Dashboard & Interactive Chart Server
//!
//! A single-purpose data-visualization service: fetch the NYT US-states
//! COVID-19 time series, hold it in memory as an immutable Polars table, and
//! serve two cross-filtered line charts (cumulative cases and deaths) behind
//! state/month/year dropdown controls.

pub mod charts;
pub mod data;
pub mod web;
