//! Per-face and mesh-level signed distance (spec §4.5).
use cgmath::prelude::*;
use cgmath::BaseFloat;

use crate::space::Vec3;
use super::build::drop_axis;
use super::mesh::{ FaceId, Mesh };
use super::polygon2d::{ self, InsideTest };

/// Signed distance from `p` to a single face: inside the face's 2D
/// projection the distance is just the signed plane distance; outside it,
/// the closest point lies on an edge or vertex and is signed by that
/// entity's pseudonormal (spec §4.5, steps 3-4).
pub fn face_signed_distance<T: BaseFloat, M: Clone>(mesh: &Mesh<T, M>, face_id: FaceId, p: Vec3<T>, test: InsideTest) -> T {
    let face = mesh.face(face_id);
    let n = face.normal;
    let c = face.centroid;
    let plane_distance = n.dot(p - c);

    let projection = match &face.projection {
        Some(projection) => projection,
        None => return plane_distance,
    };

    let p_prime = p - n * plane_distance;
    let p2 = drop_axis(p_prime, projection.dropped_axis);

    if polygon2d::point_in_polygon(&projection.points, p2, test) {
        return plane_distance;
    }

    let mut best: Option<T> = None;
    for he in mesh.face_half_edges(face_id) {
        let edge = mesh.half_edge(he);
        let a_id = edge.origin;
        let b_id = mesh.half_edge(edge.next.unwrap()).origin;
        let a = mesh.vertex(a_id).position;
        let b = mesh.vertex(b_id).position;
        let ab = b - a;
        let len2 = ab.magnitude2();

        let t = if len2 > T::epsilon() { (p - a).dot(ab) / len2 } else { T::zero() };

        let candidate = if t <= T::zero() {
            signed_magnitude(p - a, mesh.vertex(a_id).normal)
        } else if t >= T::one() {
            signed_magnitude(p - b, mesh.vertex(b_id).normal)
        } else {
            let closest = a + ab * t;
            signed_magnitude(p - closest, edge.normal)
        };

        best = Some(match best {
            None => candidate,
            Some(b) if candidate.abs() < b.abs() => candidate,
            Some(b) => b,
        });
    }

    best.unwrap_or(T::infinity())
}

fn signed_magnitude<T: BaseFloat>(to_point: Vec3<T>, normal: Vec3<T>) -> T {
    let mag = to_point.magnitude();
    if normal.dot(to_point) >= T::zero() { mag } else { -mag }
}

/// Mesh-level signed distance: the candidate of smallest magnitude over
/// every face.
pub fn mesh_signed_distance<T: BaseFloat, M: Clone>(mesh: &Mesh<T, M>, p: Vec3<T>, test: InsideTest) -> T {
    let mut best: Option<T> = None;
    for face_id in mesh.face_ids() {
        let d = face_signed_distance(mesh, face_id, p, test);
        best = Some(match best {
            None => d,
            Some(b) if d.abs() < b.abs() => d,
            Some(b) => b,
        });
    }
    best.unwrap_or(T::infinity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::build;
    use crate::error::SanityReport;
    use crate::soup::Soup;

    fn tetrahedron_mesh() -> Mesh<f64, ()> {
        let v = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let facets = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
        let soup = Soup::new(v, facets);
        let mut report = SanityReport::new();
        build::build(&soup, &mut report)
    }

    #[test]
    fn centroid_is_inside_corner_is_outside() {
        let mesh = tetrahedron_mesh();
        let inside = mesh_signed_distance(&mesh, Vec3::new(0.25, 0.25, 0.25), InsideTest::default());
        assert!(inside < 0.0, "centroid must read negative, got {}", inside);

        let outside = mesh_signed_distance(&mesh, Vec3::new(1.0, 1.0, 1.0), InsideTest::default());
        let expected = 2.0 / 3f64.sqrt();
        assert!(outside > 0.0);
        assert!((outside - expected).abs() < 1e-6, "got {}, expected {}", outside, expected);
    }
}
