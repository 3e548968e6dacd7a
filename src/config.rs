//! Numeric configuration shared by the engine and the algorithm helpers.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default threshold below which a probability or magnitude counts as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Simulator settings.
///
/// # Example
/// ```
/// use qcsim::config::SimConfig;
///
/// let config = SimConfig::from_json(r#"{ "tolerance": 1e-6 }"#).unwrap();
/// assert!(config.is_negligible(5e-7));
/// assert!(!config.is_negligible(5e-6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Probabilities at or below this value are treated as impossible outcomes.
    pub tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SimConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Parse a config from JSON. Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True when `value` is within tolerance of zero (NaN counts as negligible).
    pub fn is_negligible(&self, value: f64) -> bool {
        !(value.abs() > self.tolerance)
    }
}
