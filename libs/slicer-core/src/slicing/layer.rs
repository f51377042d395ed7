use serde::{Deserialize, Serialize};

use super::LineSegment;

/// All segments found at one cutting height, in the order the triangles
/// produced them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layer {
    /// Height of the cutting plane
    pub z_height: f64,
    segments: Vec<LineSegment>,
}

impl Layer {
    /// Creates an empty layer at `z_height`.
    pub fn new(z_height: f64) -> Self {
        Self {
            z_height,
            segments: Vec::new(),
        }
    }

    pub fn add_segment(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Removes every segment, keeping the height.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Sum of the XY lengths of all segments.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(LineSegment::length).sum()
    }
}
