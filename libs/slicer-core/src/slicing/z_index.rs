//! # Z-Bucket Index
//!
//! Partitions a mesh's triangles into horizontal slabs so that each cutting
//! plane only visits triangles whose Z span can reach it.
//!
//! ## Bucketing
//!
//! Bucket `b` covers `[min_z + b * h, min_z + (b + 1) * h)`. A triangle is
//! listed in every bucket its Z span touches. The lower end of each span is
//! widened by twice `EPSILON`, so a triangle whose lowest vertex sits just
//! above a plane (inside the `On` band) is still found for that plane.
//! Extra candidates are harmless; missing ones would drop segments.
//!
//! When the mesh would need more than `MAX_LAYER_COUNT` slabs, or the slab
//! height is at or below `EPSILON`, every triangle goes into one bucket and
//! queries degrade to a full scan.
//!
//! ## Example
//!
//! ```rust
//! use slicer_core::primitives::create_box;
//! use slicer_core::slicing::ZIndex;
//! use slicer_core::Vec3;
//!
//! let mesh = create_box(Vec3::splat(1.0), false).unwrap();
//! let index = ZIndex::build(&mesh, 0.25);
//!
//! assert_eq!(index.triangles_at_z(0.5).count(), 8);
//! assert_eq!(index.triangles_at_z(3.0).count(), 0);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::geometry::Triangle;
use crate::mesh::Mesh;
use config::constants::{EPSILON, MAX_LAYER_COUNT};

/// Statistics about a built index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ZIndexStats {
    /// Non-empty buckets
    pub total_buckets: usize,
    /// Triangles placed in at least one bucket
    pub total_triangles: usize,
    /// Sum of bucket sizes
    pub total_references: usize,
    /// `total_references / total_buckets`, zero when there are no buckets
    pub avg_triangles_per_bucket: f64,
    /// Lowest indexed Z
    pub min_z: f64,
    /// Highest indexed Z
    pub max_z: f64,
}

/// Height-bucketed triangle lookup over a borrowed mesh.
///
/// Buckets hold indices into the mesh's triangle list, so the index cannot
/// outlive the mesh and the mesh cannot change while the index exists.
#[derive(Debug, Clone)]
pub struct ZIndex<'a> {
    /// Indexed mesh
    mesh: &'a Mesh,
    /// Bucket -> triangle indices in mesh order
    buckets: BTreeMap<i64, Vec<usize>>,
    /// Slab height
    bucket_height: f64,
    /// Every triangle lives in bucket 0
    single_bucket: bool,
    /// Lowest vertex Z over indexed triangles
    min_z: f64,
    /// Highest vertex Z over indexed triangles
    max_z: f64,
    /// Triangles placed in at least one bucket
    indexed_triangles: usize,
}

impl<'a> ZIndex<'a> {
    /// Builds an index over `mesh` with slabs of `bucket_height`.
    ///
    /// An empty mesh or a non-positive height yields an empty index that
    /// answers every query with nothing. Triangles with a non-finite Z are
    /// left out. A height at or below `EPSILON`, or one that would split the
    /// mesh into more than `MAX_LAYER_COUNT` slabs, places every triangle in
    /// a single bucket, so the work done here stays bounded by the triangle
    /// count times `MAX_LAYER_COUNT`.
    pub fn build(mesh: &'a Mesh, bucket_height: f64) -> Self {
        let mut index = Self {
            mesh,
            buckets: BTreeMap::new(),
            bucket_height,
            single_bucket: false,
            min_z: 0.0,
            max_z: 0.0,
            indexed_triangles: 0,
        };

        if mesh.is_empty() || bucket_height.is_nan() || bucket_height <= 0.0 {
            return index;
        }

        let finite = |tri: &Triangle| tri.vertices().iter().all(|v| v.z.is_finite());

        let (min_z, max_z) = mesh
            .triangles()
            .iter()
            .filter(|&tri| finite(tri))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), tri| {
                (lo.min(tri.min_z()), hi.max(tri.max_z()))
            });
        if min_z > max_z {
            // Nothing finite to index.
            return index;
        }
        index.min_z = min_z;
        index.max_z = max_z;
        index.single_bucket =
            bucket_height <= EPSILON || (max_z - min_z) / bucket_height > MAX_LAYER_COUNT as f64;
        if index.single_bucket {
            debug!(
                span = max_z - min_z,
                bucket_height,
                "Z span too fine-grained for bucketing, using a single bucket"
            );
        }

        let mut skipped = 0usize;
        for (i, tri) in mesh.triangles().iter().enumerate() {
            if !finite(tri) {
                skipped += 1;
                continue;
            }
            let first = index.bucket_of(tri.min_z() - 2.0 * EPSILON);
            let last = index.bucket_of(tri.max_z());
            for bucket in first..=last {
                index.buckets.entry(bucket).or_default().push(i);
            }
            index.indexed_triangles += 1;
        }

        if skipped > 0 {
            debug!(skipped, "Left non-finite triangles out of Z index");
        }

        index
    }

    /// Bucket containing `z`.
    fn bucket_of(&self, z: f64) -> i64 {
        if self.single_bucket {
            return 0;
        }
        ((z - self.min_z) / self.bucket_height).floor() as i64
    }

    /// Indices of candidate triangles for a plane at `z`, in mesh order.
    ///
    /// Empty when `z` lies more than `EPSILON` outside the indexed range.
    pub fn triangle_refs_at_z(&self, z: f64) -> &[usize] {
        if self.buckets.is_empty()
            || z.is_nan()
            || z < self.min_z - EPSILON
            || z > self.max_z + EPSILON
        {
            return &[];
        }
        self.buckets
            .get(&self.bucket_of(z))
            .map_or(&[], Vec::as_slice)
    }

    /// Candidate triangles for a plane at `z`, in mesh order.
    pub fn triangles_at_z(&self, z: f64) -> impl Iterator<Item = &'a Triangle> + '_ {
        let mesh = self.mesh;
        self.triangle_refs_at_z(z)
            .iter()
            .filter_map(move |&i| mesh.triangle(i))
    }

    /// The indexed mesh.
    #[inline]
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    /// Slab height the index was built with.
    #[inline]
    pub fn bucket_height(&self) -> f64 {
        self.bucket_height
    }

    /// Returns true if no triangle was indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket and reference counts.
    pub fn stats(&self) -> ZIndexStats {
        let total_buckets = self.buckets.len();
        let total_references: usize = self.buckets.values().map(Vec::len).sum();
        ZIndexStats {
            total_buckets,
            total_triangles: self.indexed_triangles,
            total_references,
            avg_triangles_per_bucket: if total_buckets > 0 {
                total_references as f64 / total_buckets as f64
            } else {
                0.0
            },
            min_z: self.min_z,
            max_z: self.max_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::primitives::create_box;

    fn flat_tri(z: f64) -> Triangle {
        Triangle::from_vertices(
            Vec3::new(0.0, 0.0, z),
            Vec3::new(1.0, 0.0, z),
            Vec3::new(0.0, 1.0, z),
        )
    }

    #[test]
    fn test_empty_mesh_gives_empty_index() {
        let mesh = Mesh::new();
        let index = ZIndex::build(&mesh, 0.2);
        assert!(index.is_empty());
        assert_eq!(index.triangles_at_z(0.0).count(), 0);
        assert_eq!(index.stats(), ZIndexStats::default());
    }

    #[test]
    fn test_non_positive_bucket_height_gives_empty_index() {
        let mesh = create_box(Vec3::ONE, false).unwrap();
        assert!(ZIndex::build(&mesh, 0.0).is_empty());
        assert!(ZIndex::build(&mesh, -1.0).is_empty());
        assert!(ZIndex::build(&mesh, f64::NAN).is_empty());
    }

    #[test]
    fn test_tiny_bucket_height_uses_single_bucket() {
        let mesh = create_box(Vec3::ONE, false).unwrap();
        let index = ZIndex::build(&mesh, 1e-7);
        let stats = index.stats();
        assert_eq!(stats.total_buckets, 1);
        assert_eq!(stats.total_references, 12);
        assert_eq!(index.triangles_at_z(0.5).count(), 12);
    }

    #[test]
    fn test_tall_mesh_with_fine_buckets_uses_single_bucket() {
        // 1e9 mm at 0.01 mm would be 1e11 slabs.
        let tall = Triangle::from_vertices(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 1.0e9));
        let mesh = Mesh::from_triangles(vec![tall, flat_tri(0.5)]);
        let index = ZIndex::build(&mesh, 0.01);
        let stats = index.stats();

        assert_eq!(stats.total_buckets, 1);
        assert_eq!(stats.total_references, 2);
        assert_eq!(index.triangle_refs_at_z(0.5), &[0, 1]);
        assert_eq!(index.triangle_refs_at_z(5.0e8), &[0, 1]);
        assert!(index.triangle_refs_at_z(2.0e9).is_empty());
    }

    #[test]
    fn test_bucket_count_at_limit_is_kept() {
        let tall = Triangle::from_vertices(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 1000.0));
        let mesh = Mesh::from_triangles(vec![tall]);
        // 1000 / 0.01 = 100 000 slabs, exactly the ceiling.
        let index = ZIndex::build(&mesh, 0.01);
        assert!(index.stats().total_buckets > 1);
    }

    #[test]
    fn test_query_outside_range_is_empty() {
        let mesh = create_box(Vec3::ONE, false).unwrap();
        let index = ZIndex::build(&mesh, 0.25);
        assert!(index.triangle_refs_at_z(-0.1).is_empty());
        assert!(index.triangle_refs_at_z(1.1).is_empty());
        assert!(index.triangle_refs_at_z(f64::NAN).is_empty());
        // Within the tolerance band of the bottom face.
        assert!(!index.triangle_refs_at_z(-5e-7).is_empty());
    }

    #[test]
    fn test_triangle_spanning_buckets_is_listed_in_each() {
        let tall = Triangle::from_vertices(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 1.0));
        let mesh = Mesh::from_triangles(vec![tall]);
        let index = ZIndex::build(&mesh, 0.25);

        for z in [0.0, 0.3, 0.6, 0.9, 1.0] {
            assert_eq!(index.triangle_refs_at_z(z), &[0]);
        }
    }

    #[test]
    fn test_lowest_vertex_just_above_plane_is_found() {
        // The upper triangle's base sits in bucket 1 while the plane falls in
        // bucket 0, yet the base is within the On band of the plane.
        let mesh = Mesh::from_triangles(vec![
            Triangle::from_vertices(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 0.5)),
            Triangle::from_vertices(
                Vec3::new(0.0, 0.0, 1.0 + 5e-7),
                Vec3::new(1.0, 0.0, 1.0 + 5e-7),
                Vec3::new(0.0, 0.0, 2.0),
            ),
        ]);
        let index = ZIndex::build(&mesh, 1.0);
        let plane = 1.0 - 3e-7;

        assert!(index.triangle_refs_at_z(plane).contains(&1));
        assert!(crate::slicing::intersect_triangle(&mesh.triangles()[1], plane).is_some());
    }

    #[test]
    fn test_non_finite_triangles_are_skipped() {
        let mut bad = flat_tri(0.5);
        bad.v1.z = f64::NEG_INFINITY;
        let mesh = Mesh::from_triangles(vec![flat_tri(0.0), bad, flat_tri(1.0)]);
        let index = ZIndex::build(&mesh, 0.25);
        let stats = index.stats();

        assert_eq!(stats.total_triangles, 2);
        assert_eq!(stats.min_z, 0.0);
        assert_eq!(stats.max_z, 1.0);
        assert!(!index.triangle_refs_at_z(0.5).contains(&1));
    }

    #[test]
    fn test_stats_for_box() {
        let mesh = create_box(Vec3::ONE, false).unwrap();
        let stats = ZIndex::build(&mesh, 0.25).stats();

        assert_eq!(stats.total_triangles, 12);
        assert!(stats.total_buckets >= 4);
        assert!(stats.total_references >= 12);
        assert_eq!(stats.min_z, 0.0);
        assert_eq!(stats.max_z, 1.0);
        assert!(stats.avg_triangles_per_bucket > 0.0);
    }

    #[test]
    fn test_candidates_keep_mesh_order() {
        let mesh = Mesh::from_triangles(vec![flat_tri(0.1), flat_tri(0.1), flat_tri(0.1)]);
        let index = ZIndex::build(&mesh, 1.0);
        assert_eq!(index.triangle_refs_at_z(0.1), &[0, 1, 2]);
    }
}
