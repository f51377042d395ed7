//! Slicing parameters and output.

use serde::{Deserialize, Serialize};

use super::Layer;
use crate::error::SlicingError;
use config::constants::{is_valid_layer_height, DEFAULT_LAYER_HEIGHT, DEFAULT_USE_SPATIAL_INDEX, EPSILON};

/// Parameters for [`slice`](super::slice).
///
/// Missing fields take their defaults when deserializing.
///
/// # Example
///
/// ```rust
/// use slicer_core::SlicingSettings;
///
/// let settings = SlicingSettings::new(0.1).with_z_range(2.0, 8.0);
/// assert!(settings.has_explicit_z_range());
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicingSettings {
    /// Distance between cutting planes in mm
    pub layer_height: f64,
    /// Lower end of the range; ignored unless `max_z > min_z + EPSILON`
    pub min_z: f64,
    /// Upper end of the range
    pub max_z: f64,
    /// Build a Z-bucket index before slicing
    pub use_spatial_index: bool,
}

impl Default for SlicingSettings {
    fn default() -> Self {
        Self {
            layer_height: DEFAULT_LAYER_HEIGHT,
            min_z: 0.0,
            max_z: 0.0,
            use_spatial_index: DEFAULT_USE_SPATIAL_INDEX,
        }
    }
}

impl SlicingSettings {
    /// Default settings with the given layer height.
    pub fn new(layer_height: f64) -> Self {
        Self {
            layer_height,
            ..Self::default()
        }
    }

    /// Restricts slicing to `[min_z, max_z]`.
    pub fn with_z_range(mut self, min_z: f64, max_z: f64) -> Self {
        self.min_z = min_z;
        self.max_z = max_z;
        self
    }

    pub fn with_spatial_index(mut self, enabled: bool) -> Self {
        self.use_spatial_index = enabled;
        self
    }

    /// True when the configured range overrides the mesh bounds.
    pub fn has_explicit_z_range(&self) -> bool {
        self.max_z > self.min_z + EPSILON
    }

    /// Checks the layer height against the accepted range.
    pub fn validate(&self) -> Result<(), SlicingError> {
        if is_valid_layer_height(self.layer_height) {
            Ok(())
        } else {
            Err(SlicingError::invalid_layer_height(self.layer_height))
        }
    }
}

/// Output of a successful slice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlicingResult {
    /// Non-empty layers in ascending Z
    pub layers: Vec<Layer>,
    /// Segments across all layers
    pub total_segments: usize,
    /// Height of the sliced range
    pub total_height: f64,
    /// Layer height used
    pub layer_height: f64,
}

impl SlicingResult {
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
