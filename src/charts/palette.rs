//! State Color Palette
//! Stable per-state colors for the multi-line charts.

use std::collections::HashMap;

/// Qualitative palette for state lines.
pub const PALETTE: [&str; 10] = [
    "#636efa", // Blue
    "#ef553b", // Red
    "#00cc96", // Green
    "#ab63fa", // Purple
    "#ffa15a", // Orange
    "#19d3f3", // Cyan
    "#ff6692", // Pink
    "#b6e880", // Lime
    "#ff97ff", // Magenta
    "#fecb52", // Yellow
];

/// Mapping from state name to display color, keyed by identity rather than
/// by filtered-subset position. Assigned once per render pass over the
/// global state list so a state keeps its color when the result set
/// shrinks, and across both charts.
pub struct ColorAssignment {
    colors: HashMap<String, &'static str>,
}

impl ColorAssignment {
    /// Assign palette colors in first-appearance order, cycling when states
    /// outnumber colors.
    pub fn new(states: &[String]) -> Self {
        let colors = states
            .iter()
            .enumerate()
            .map(|(i, state)| (state.clone(), PALETTE[i % PALETTE.len()]))
            .collect();
        Self { colors }
    }

    /// Get the color for a state.
    pub fn get(&self, state: &str) -> Option<&'static str> {
        self.colors.get(state).copied()
    }
}
