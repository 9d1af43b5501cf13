use serde::{Deserialize, Serialize};

/// Fully-charged samples kept on each side of the unplugged period.
pub const DEFAULT_MARGIN: usize = 5;
/// How far below the full level still counts as fully charged (percentage points).
pub const DEFAULT_TOLERANCE: f64 = 0.0;
/// Nominal fully-charged level (percent of capacity).
pub const FULL_LEVEL: f64 = 100.0;

/// Parameters for selecting the last unplugged period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Context samples to keep on each side of the period.
    pub margin: usize,
    /// Percentage points below `full_level` that still count as fully
    /// charged. E.g. 0.5 means anything at or above 99.5% is full.
    pub tolerance: f64,
    /// The level a sample is compared against. 100 for a percentage log;
    /// any other high baseline works the same way.
    pub full_level: f64,
}

impl FilterConfig {
    /// The threshold separating fully-charged samples from discharge
    /// samples. A sample exactly at the threshold counts as fully charged.
    pub fn full_value(&self) -> f64 {
        self.full_level - self.tolerance
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            margin: DEFAULT_MARGIN,
            tolerance: DEFAULT_TOLERANCE,
            full_level: FULL_LEVEL,
        }
    }
}
