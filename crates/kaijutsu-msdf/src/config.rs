//! Generation settings, loadable from `.msdf.ron` files.
//!
//! ```ron
//! (
//!     range: Px(4.0),
//!     angle_threshold: 3.0,
//!     seed: 0,
//!     edge_threshold: 1.001,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MsdfError;
use crate::projection::Range;

/// Settings for the full color → generate → correct pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsdfConfig {
    /// Width of the encoded distance band.
    pub range: Range,
    /// Joins turning by more than this (radians) are corners.
    pub angle_threshold: f64,
    /// Seed for edge color choices.
    pub seed: u64,
    /// Clash sensitivity for error correction, in pixels of distance
    /// change between neighbours. Zero or negative disables correction.
    pub edge_threshold: f64,
    /// Overrides the shape's own `inverse_y_axis` when set.
    pub flip_y: Option<bool>,
}

impl Default for MsdfConfig {
    fn default() -> Self {
        Self {
            range: Range::Px(4.0),
            angle_threshold: 3.0,
            seed: 0,
            edge_threshold: 1.001,
            flip_y: None,
        }
    }
}

impl MsdfConfig {
    /// Parse a config from RON text. Missing fields take their defaults.
    pub fn from_ron(text: &str) -> Result<Self, MsdfError> {
        let config: MsdfConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MsdfError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn to_ron(&self) -> Result<String, MsdfError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<(), MsdfError> {
        let range = self.range.value();
        if !range.is_finite() || range <= 0.0 {
            return Err(MsdfError::InvalidRange(range));
        }
        if !self.angle_threshold.is_finite() || self.angle_threshold <= 0.0 {
            return Err(MsdfError::InvalidConfig(format!(
                "angle_threshold must be positive, got {}",
                self.angle_threshold
            )));
        }
        if !self.edge_threshold.is_finite() {
            return Err(MsdfError::InvalidConfig(format!(
                "edge_threshold must be finite, got {}",
                self.edge_threshold
            )));
        }
        Ok(())
    }

    pub fn error_correction_enabled(&self) -> bool {
        self.edge_threshold > 0.0
    }
}
