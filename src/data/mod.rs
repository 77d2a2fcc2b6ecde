//! Data module - dataset download and the in-memory observation table

mod loader;

pub use loader::{CovidData, DataLoader, LoaderError};
pub use loader::{CASES_COL, DATA_URL, DATE_COL, DEATHS_COL, STATE_COL};
pub(crate) use loader::date_from_epoch_days;
