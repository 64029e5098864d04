//! Cross-module assertions drawn from spec §8's "End-to-end scenarios",
//! which don't belong to any single unit under test.
use ebgeom::dcel;
use ebgeom::implicit::{ Complement, ImplicitFunction, SignedDistance, Sphere, SmoothKind, SmoothUnion, Union, Cuboid };
use ebgeom::{ Soup, SanityReport, Vec3 };

/// Scenario 1: unit sphere at origin, point (2, 0, 0): signed_distance = 1.0.
#[test]
fn unit_sphere_signed_distance_at_two_zero_zero() {
    let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
    assert!((sphere.signed_distance(Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
}

/// Scenario 2: axis-aligned box (-1,-1,-1)..(1,1,1), point (2, 2, 0): distance = sqrt(2).
#[test]
fn box_distance_to_diagonal_corner_is_root_two() {
    let cuboid = Cuboid::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
    let expected = 2f64.sqrt();
    assert!((cuboid.value(Vec3::new(2.0, 2.0, 0.0)) - expected).abs() < 1e-9);
}

/// Scenario 3: union of two unit spheres at (+/-2, 0, 0), origin: value = 1.0.
#[test]
fn union_of_two_spheres_at_origin_is_one() {
    let a: Box<dyn ImplicitFunction<f64>> = Box::new(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0));
    let b: Box<dyn ImplicitFunction<f64>> = Box::new(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0));
    let union = Union::new(vec![a, b]);
    assert!((union.value(Vec3::new(0.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
}

/// Scenario 4: smooth union of the same two spheres with s=1, origin:
/// value strictly in (1.0 - s/4, 1.0).
#[test]
fn smooth_union_at_origin_is_strictly_between_bound_and_one() {
    let a: Box<dyn ImplicitFunction<f64>> = Box::new(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0));
    let b: Box<dyn ImplicitFunction<f64>> = Box::new(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0));
    let smooth = SmoothUnion::new(vec![a, b], 1.0, SmoothKind::Polynomial);
    let v = smooth.value(Vec3::new(0.0, 0.0, 0.0));
    assert!(v < 1.0, "expected strictly less than 1.0, got {}", v);
    assert!(v > 1.0 - 0.25, "expected strictly greater than 0.75, got {}", v);
}

/// Scenario 5: closed tetrahedron mesh, centroid (1/4,1/4,1/4) is inside;
/// (1,1,1) is outside at distance 2/sqrt(3) (the distance to plane x+y+z=1).
#[test]
fn tetrahedron_mesh_signed_distance_matches_plane_distance_outside() {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    // Outward-facing winding for this vertex order (right-hand rule).
    let facets = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
    let soup = Soup::new(vertices, facets);

    let mut report = SanityReport::new();
    let mesh: dcel::Mesh<f64, ()> = dcel::build(&soup, &mut report);
    assert!(report.diagnostics().iter().all(|d| !matches!(d, ebgeom::Diagnostic::TopologyBroken { .. })));

    let inside = dcel::mesh_signed_distance(&mesh, Vec3::new(0.25, 0.25, 0.25), dcel::InsideTest::default());
    assert!(inside < 0.0, "centroid must be inside (negative), got {}", inside);

    let outside = dcel::mesh_signed_distance(&mesh, Vec3::new(1.0, 1.0, 1.0), dcel::InsideTest::default());
    let expected = 2.0 / 3f64.sqrt();
    assert!(outside > 0.0, "(1,1,1) must be outside (positive), got {}", outside);
    assert!((outside - expected).abs() < 1e-6, "expected {} got {}", expected, outside);
}

/// Scenario 6: complement of the unit sphere, at the origin: value = +1.0.
#[test]
fn complement_of_unit_sphere_at_origin_is_plus_one() {
    let sphere: Box<dyn ImplicitFunction<f64>> = Box::new(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0));
    let complement = Complement::new(sphere);
    assert!((complement.value(Vec3::new(0.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
}

/// Lipschitz bound from spec §8: |sd(p) - sd(q)| <= |p - q| * (1 + eps), for
/// a true distance field (here, a single sphere).
#[test]
fn sphere_sdf_is_lipschitz() {
    let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
    let points = [
        Vec3::new(0.3, 0.1, 0.2),
        Vec3::new(1.5, -0.4, 0.9),
        Vec3::new(-2.0, 2.0, -1.0),
        Vec3::new(0.0, 0.0, 3.0),
    ];
    for &p in &points {
        for &q in &points {
            let lhs = (sphere.value(p) - sphere.value(q)).abs();
            let distance = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2) + (p.z - q.z).powi(2)).sqrt();
            assert!(lhs <= distance * (1.0 + 1e-9), "lhs={} distance={}", lhs, distance);
        }
    }
}
