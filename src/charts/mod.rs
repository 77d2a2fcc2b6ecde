//! Charts module - filter/render engine and chart specifications

mod engine;
mod palette;
mod spec;

pub use engine::{ChartEngine, EngineError, Selection, ALL_STATES};
pub use palette::{ColorAssignment, PALETTE};
pub use spec::{AxisRange, ChartSpec, Series, SeriesPoint};
