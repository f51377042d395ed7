//! Property-based tests for slicing invariants using the `proptest` crate.

use proptest::prelude::*;

use slicer_core::slicing::{intersect_triangle, ZIndex};
use slicer_core::{slice, Layer, Mesh, SlicingError, SlicingSettings, Triangle, Vec3};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_vertex() -> impl Strategy<Value = Vec3> {
    (-50.0f64..50.0, -50.0f64..50.0, -20.0f64..20.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_triangle() -> impl Strategy<Value = Triangle> {
    (arb_vertex(), arb_vertex(), arb_vertex()).prop_map(|(a, b, c)| Triangle::from_vertices(a, b, c))
}

/// Triangle soups, occasionally snapped to a coarse grid so vertices land
/// exactly on cutting planes.
fn arb_mesh() -> impl Strategy<Value = Mesh> {
    (prop::collection::vec(arb_triangle(), 1..40), any::<bool>()).prop_map(|(triangles, snap)| {
        let snap_vertex = |v: Vec3| if snap { (v * 4.0).round() / 4.0 } else { v };
        triangles
            .into_iter()
            .map(|t| {
                Triangle::from_vertices(snap_vertex(t.v0), snap_vertex(t.v1), snap_vertex(t.v2))
            })
            .collect::<Mesh>()
    })
}

fn arb_layer_height() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.25), Just(0.5), 0.05f64..5.0]
}

fn sorted_segment_bits(layer: &Layer) -> Vec<[u64; 6]> {
    let mut keys: Vec<[u64; 6]> = layer
        .segments()
        .iter()
        .map(|s| {
            [
                s.start.x.to_bits(),
                s.start.y.to_bits(),
                s.start.z.to_bits(),
                s.end.x.to_bits(),
                s.end.y.to_bits(),
                s.end.z.to_bits(),
            ]
        })
        .collect();
    keys.sort_unstable();
    keys
}

const EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Successful results are well formed
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn results_are_well_formed(mesh in arb_mesh(), h in arb_layer_height()) {
        match slice(&mesh, &SlicingSettings::new(h)) {
            Ok(result) => {
                let mut sum = 0;
                for layer in &result.layers {
                    prop_assert!(!layer.is_empty());
                    sum += layer.segment_count();
                    for seg in layer.segments() {
                        prop_assert!((seg.start.z - layer.z_height).abs() <= EPSILON);
                        prop_assert!((seg.end.z - layer.z_height).abs() <= EPSILON);
                    }
                }
                prop_assert_eq!(result.total_segments, sum);
                prop_assert!(result
                    .layers
                    .windows(2)
                    .all(|w| w[0].z_height < w[1].z_height));
            }
            Err(err) => prop_assert!(
                matches!(err, SlicingError::InvalidBounds { .. } | SlicingError::NoIntersections { .. }),
                "unexpected error {:?}", err
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Indexed and scanning paths agree
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn index_matches_scan(mesh in arb_mesh(), h in arb_layer_height()) {
        let indexed = slice(&mesh, &SlicingSettings::new(h));
        let scanned = slice(&mesh, &SlicingSettings::new(h).with_spatial_index(false));

        match (indexed, scanned) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.total_segments, b.total_segments);
                prop_assert_eq!(a.layers.len(), b.layers.len());
                for (la, lb) in a.layers.iter().zip(&b.layers) {
                    prop_assert_eq!(la.z_height, lb.z_height);
                    prop_assert_eq!(sorted_segment_bits(la), sorted_segment_bits(lb));
                }
            }
            (a, b) => prop_assert_eq!(a.err(), b.err()),
        }
    }
}

// ---------------------------------------------------------------------------
// 3. The index never drops a triangle that intersects the plane
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn index_has_no_false_negatives(
        mesh in arb_mesh(),
        h in arb_layer_height(),
        z in -21.0f64..21.0,
    ) {
        let index = ZIndex::build(&mesh, h);
        let candidates = index.triangle_refs_at_z(z);

        for (i, tri) in mesh.triangles().iter().enumerate() {
            if intersect_triangle(tri, z).is_some() {
                prop_assert!(candidates.contains(&i), "triangle {} missed at z = {}", i, z);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Slicing is deterministic
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn slicing_is_deterministic(mesh in arb_mesh(), h in arb_layer_height()) {
        let settings = SlicingSettings::new(h);
        prop_assert_eq!(slice(&mesh, &settings), slice(&mesh, &settings));
    }
}
