use super::*;
use approx::assert_relative_eq;

fn right_triangle() -> Triangle {
    Triangle::from_vertices(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 1.0),
    )
}

#[test]
fn test_triangle_z_range() {
    let tri = right_triangle();
    assert_eq!(tri.min_z(), 0.0);
    assert_eq!(tri.max_z(), 1.0);
}

#[test]
fn test_triangle_from_vertices_normal_is_unit() {
    let tri = right_triangle();
    assert_relative_eq!(tri.normal.length(), 1.0, epsilon = 1e-12);
    // Counter-clockwise in XY, so the normal points up.
    assert!(tri.normal.z > 0.0);
}

#[test]
fn test_degenerate_triangle_gets_up_normal() {
    let p = Vec3::new(1.0, 1.0, 1.0);
    let tri = Triangle::from_vertices(p, p, p);
    assert_eq!(tri.normal, Vec3::Z);
    assert_eq!(tri.area(), 0.0);
}

#[test]
fn test_triangle_area() {
    let tri = Triangle::from_vertices(Vec3::ZERO, Vec3::X * 3.0, Vec3::Y * 4.0);
    assert_relative_eq!(tri.area(), 6.0);
}

#[test]
fn test_signed_volume_sign_follows_winding() {
    let tri = Triangle::from_vertices(Vec3::X, Vec3::Y, Vec3::Z);
    let flipped = Triangle::from_vertices(Vec3::X, Vec3::Z, Vec3::Y);
    assert_relative_eq!(tri.signed_volume(), 1.0 / 6.0);
    assert_relative_eq!(flipped.signed_volume(), -1.0 / 6.0);
}

#[test]
fn test_has_finite_vertices() {
    let mut tri = right_triangle();
    assert!(tri.has_finite_vertices());
    tri.v1.y = f64::INFINITY;
    assert!(!tri.has_finite_vertices());
}

#[test]
fn test_flip_normal() {
    let mut tri = right_triangle();
    let before = tri.normal;
    tri.flip_normal();
    assert_eq!(tri.normal, -before);
}

#[test]
fn test_aabb_new_orders_corners() {
    let aabb = Aabb::new(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 0.0));
    assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
    assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 5.0));
    assert_eq!(aabb.height(), 5.0);
}

#[test]
fn test_aabb_from_no_points() {
    assert!(Aabb::from_points(std::iter::empty()).is_none());
}

#[test]
fn test_aabb_contains_boundary() {
    let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
    assert!(aabb.contains(Vec3::ONE));
    assert!(aabb.contains(Vec3::splat(0.5)));
    assert!(!aabb.contains(Vec3::new(1.5, 0.5, 0.5)));
}

#[test]
fn test_aabb_union_and_center() {
    let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
    let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
    let u = a.union(&b);
    assert_eq!(u.min, Vec3::ZERO);
    assert_eq!(u.max, Vec3::splat(3.0));
    assert_eq!(u.center(), Vec3::splat(1.5));
}

#[test]
fn test_default_aabb_is_unset() {
    assert!(Aabb::default().is_unset());
    assert!(!Aabb::new(Vec3::ZERO, Vec3::ONE).is_unset());
}

#[test]
fn test_normalize_or_up_rejects_nan() {
    assert_eq!(normalize_or_up(Vec3::splat(f64::NAN), 1e-8), Vec3::Z);
}
