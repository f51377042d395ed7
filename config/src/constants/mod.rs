//! # Configuration Constants
//!
//! Centralized constants for the slicing pipeline.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point tolerances
//! - **Slicing Limits**: Layer height range and layer count ceiling
//! - **Slicing Defaults**: Values used when settings are not supplied
//! - **Mesh Quality**: Tolerances shared by the validator and repairer
//! - **Import Limits**: Safety bounds for model readers

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Tolerance for plane classification and Z comparisons, in millimetres.
///
/// A vertex within `EPSILON` of a cutting plane is classified as lying on
/// it. The value is part of the slicing contract.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn on_plane(vertex_z: f64, plane_z: f64) -> bool {
///     (vertex_z - plane_z).abs() <= EPSILON
/// }
///
/// assert!(on_plane(2.0000001, 2.0));
/// assert!(!on_plane(2.001, 2.0));
/// ```
pub const EPSILON: f64 = 1e-6;

// =============================================================================
// SLICING LIMITS
// =============================================================================

/// Smallest accepted layer height (mm).
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_LAYER_HEIGHT;
/// assert!(0.005 < MIN_LAYER_HEIGHT);
/// ```
pub const MIN_LAYER_HEIGHT: f64 = 0.01;

/// Largest accepted layer height (mm).
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_LAYER_HEIGHT;
/// assert!(0.2 < MAX_LAYER_HEIGHT);
/// ```
pub const MAX_LAYER_HEIGHT: f64 = 10.0;

/// Maximum number of layers a single slice operation may produce.
///
/// Bounds the worst-case work for pathological settings, e.g. a tall
/// model combined with the minimum layer height.
///
/// # Example
///
/// ```rust
/// use config::constants::{MAX_LAYER_COUNT, MIN_LAYER_HEIGHT};
///
/// // A 2 m tall part at the finest layer height would exceed the ceiling
/// let layers = (2000.0 / MIN_LAYER_HEIGHT).ceil() as usize;
/// assert!(layers > MAX_LAYER_COUNT);
/// ```
pub const MAX_LAYER_COUNT: usize = 100_000;

// =============================================================================
// SLICING DEFAULTS
// =============================================================================

/// Default layer height (mm) when none is configured.
pub const DEFAULT_LAYER_HEIGHT: f64 = 0.2;

/// Whether the Z-bucket index is used by default.
pub const DEFAULT_USE_SPATIAL_INDEX: bool = true;

// =============================================================================
// MESH QUALITY CONSTANTS
// =============================================================================

/// Triangles with a smaller area are reported and removed as degenerate.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_TRIANGLE_AREA;
///
/// // Half of a 1e-4 x 1e-4 square is below the threshold
/// let area = 0.5 * 1e-4 * 1e-4;
/// assert!(area < MIN_TRIANGLE_AREA);
/// ```
pub const MIN_TRIANGLE_AREA: f64 = 1e-6;

/// Distance under which two vertices are treated as the same position.
pub const VERTEX_MERGE_TOLERANCE: f64 = 1e-5;

/// Fraction of duplicate vertices above which the validator warns.
pub const DUPLICATE_WARNING_RATIO: f64 = 0.1;

/// Signed volume magnitude above which a mesh is considered closed.
pub const WATERTIGHT_VOLUME_EPSILON: f64 = 1e-6;

/// Default neighbour angle (degrees) for normal smoothing.
pub const DEFAULT_SMOOTHING_ANGLE_DEG: f64 = 30.0;

/// Quantisation scale used to match shared vertices when smoothing normals.
pub const NORMAL_SMOOTHING_KEY_SCALE: f64 = 10_000.0;

/// Lengths below this are treated as zero when normalising normals.
pub const NORMAL_LENGTH_EPSILON: f64 = 1e-8;

// =============================================================================
// IMPORT LIMITS
// =============================================================================

/// Maximum number of triangles accepted from a single model file.
///
/// Protects readers from corrupt binary headers that claim billions of
/// facets.
pub const MAX_IMPORT_TRIANGLES: usize = 50_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are equal within [`EPSILON`].
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-7));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// Checks if a f64 value is zero within [`EPSILON`].
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-7));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}

/// Checks whether a layer height lies inside the accepted range.
///
/// NaN is never accepted.
///
/// # Example
///
/// ```rust
/// use config::constants::is_valid_layer_height;
///
/// assert!(is_valid_layer_height(0.2));
/// assert!(is_valid_layer_height(0.01));
/// assert!(!is_valid_layer_height(0.005));
/// assert!(!is_valid_layer_height(f64::NAN));
/// ```
#[inline]
pub fn is_valid_layer_height(layer_height: f64) -> bool {
    (MIN_LAYER_HEIGHT..=MAX_LAYER_HEIGHT).contains(&layer_height)
}

/// Immutable snapshot of the tolerances used by mesh quality tools.
///
/// # Examples
/// ```
/// use config::constants::MeshToleranceConfig;
/// let config = MeshToleranceConfig::default();
/// assert!(config.min_triangle_area > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshToleranceConfig {
    /// Area under which a triangle is degenerate.
    pub min_triangle_area: f64,
    /// Distance under which two vertices coincide.
    pub vertex_tolerance: f64,
}

impl MeshToleranceConfig {
    /// Builds a configuration, rejecting non-positive tolerances.
    ///
    /// # Examples
    /// ```
    /// use config::constants::MeshToleranceConfig;
    /// let cfg = MeshToleranceConfig::new(1.0e-4, 1.0e-3).expect("valid config");
    /// assert_eq!(cfg.vertex_tolerance, 1.0e-3);
    /// ```
    pub fn new(min_triangle_area: f64, vertex_tolerance: f64) -> Result<Self, ConfigError> {
        if min_triangle_area.is_nan() || min_triangle_area <= 0.0 {
            return Err(ConfigError::InvalidTriangleArea(min_triangle_area));
        }
        if vertex_tolerance.is_nan() || vertex_tolerance <= 0.0 {
            return Err(ConfigError::InvalidVertexTolerance(vertex_tolerance));
        }
        Ok(Self {
            min_triangle_area,
            vertex_tolerance,
        })
    }
}

impl Default for MeshToleranceConfig {
    fn default() -> Self {
        Self {
            min_triangle_area: MIN_TRIANGLE_AREA,
            vertex_tolerance: VERTEX_MERGE_TOLERANCE,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the degenerate-area threshold is zero, negative or NaN.
    InvalidTriangleArea(f64),
    /// Raised when the vertex tolerance is zero, negative or NaN.
    InvalidVertexTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTriangleArea(value) => {
                write!(f, "min_triangle_area must be positive: {value}")
            }
            ConfigError::InvalidVertexTolerance(value) => {
                write!(f, "vertex_tolerance must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
