//! Octree bounding-volume fitter (spec §4.8): for an analytic implicit
//! function whose bounding volume is unknown, recursively split any cell
//! whose centre is close enough to the zero-set that it might cross it,
//! until a maximum depth, then enclose the corners of every leaf that
//! still intersects. A build-time utility, not on the query hot path
//! (spec §4.8: "not on the query hot path").
use cgmath::BaseFloat;

use crate::space::{ BoundingVolume, Vec3 };
use super::ImplicitFunction;

/// Approximate a bounding volume for `f` inside `[initial_lo, initial_hi]`
/// by octree subdivision (spec §4.8). A cell is split while its centre's
/// `|f|` is within `(1 + safety) * half_diagonal` of zero, i.e. the zero
/// set might pass through it, and `max_depth` hasn't been reached; every
/// leaf that still satisfies the test contributes its 8 corners to the
/// enclosing volume.
pub fn fit_bounding_volume<T: BaseFloat, F: ImplicitFunction<T> + ?Sized, BV: BoundingVolume<T>>(
    f: &F,
    initial_lo: Vec3<T>,
    initial_hi: Vec3<T>,
    max_depth: u32,
    safety_factor: T,
) -> BV {
    let mut corners = Vec::new();
    let root_hits = cell_may_intersect(f, initial_lo, initial_hi, safety_factor);
    if root_hits {
        collect_corners(f, initial_lo, initial_hi, 0, max_depth, safety_factor, &mut corners);
    }
    BV::from_points(&corners)
}

fn cell_may_intersect<T: BaseFloat, F: ImplicitFunction<T> + ?Sized>(
    f: &F,
    lo: Vec3<T>,
    hi: Vec3<T>,
    safety_factor: T,
) -> bool {
    let half = T::one() / (T::one() + T::one());
    let center = (lo + hi) * half;
    let half_diagonal = (hi - lo).magnitude() * half;
    f.value(center).abs() <= (T::one() + safety_factor) * half_diagonal
}

/// Lower-left corners of the 8 octants of the unit cube, in the same
/// lexicographic x-y-z order `original_source/`'s `Octree::LowCorner`
/// table uses.
const LOW_CORNER_FRACTIONS: [(f64, f64, f64); 8] = [
    (0.0, 0.0, 0.0),
    (0.5, 0.0, 0.0),
    (0.0, 0.5, 0.0),
    (0.5, 0.5, 0.0),
    (0.0, 0.0, 0.5),
    (0.5, 0.0, 0.5),
    (0.0, 0.5, 0.5),
    (0.5, 0.5, 0.5),
];

fn collect_corners<T: BaseFloat, F: ImplicitFunction<T> + ?Sized>(
    f: &F,
    lo: Vec3<T>,
    hi: Vec3<T>,
    depth: u32,
    max_depth: u32,
    safety_factor: T,
    corners: &mut Vec<Vec3<T>>,
) {
    if depth >= max_depth {
        push_corners(lo, hi, corners);
        return;
    }

    let delta = hi - lo;
    let half = T::from(0.5).unwrap();
    let mut split_any = false;

    for &(fx, fy, fz) in LOW_CORNER_FRACTIONS.iter() {
        let frac_lo = Vec3::new(T::from(fx).unwrap(), T::from(fy).unwrap(), T::from(fz).unwrap());
        let child_lo = lo + Vec3::new(frac_lo.x * delta.x, frac_lo.y * delta.y, frac_lo.z * delta.z);
        let child_hi = child_lo + Vec3::new(half * delta.x, half * delta.y, half * delta.z);

        if cell_may_intersect(f, child_lo, child_hi, safety_factor) {
            split_any = true;
            collect_corners(f, child_lo, child_hi, depth + 1, max_depth, safety_factor, corners);
        }
    }

    // A cell with no intersecting octant still contributes its own
    // corners: it was itself flagged as a possible intersection by its
    // parent, and `original_source/` counts it as a leaf the moment none
    // of its children warrant further descent.
    if !split_any {
        push_corners(lo, hi, corners);
    }
}

fn push_corners<T: BaseFloat>(lo: Vec3<T>, hi: Vec3<T>, corners: &mut Vec<Vec3<T>>) {
    let d = hi - lo;
    for i in 0..2u32 {
        for j in 0..2u32 {
            for k in 0..2u32 {
                corners.push(Vec3::new(
                    lo.x + T::from(i as f64).unwrap() * d.x,
                    lo.y + T::from(j as f64).unwrap() * d.y,
                    lo.z + T::from(k as f64).unwrap() * d.z,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implicit::Sphere;
    use crate::space::Aabb;

    #[test]
    fn octree_fit_of_a_unit_sphere_encloses_the_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let bv: Aabb<f64> = fit_bounding_volume(
            &sphere,
            Vec3::new(-2.0, -2.0, -2.0),
            Vec3::new(2.0, 2.0, 2.0),
            6,
            0.5,
        );

        for &axis_point in &[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            assert!(bv.distance(axis_point) < 0.3, "fit must stay close to the surface at {:?}", axis_point);
        }
    }

    #[test]
    fn deeper_trees_tighten_the_fit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let shallow: Aabb<f64> = fit_bounding_volume(&sphere, Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0), 2, 0.5);
        let deep: Aabb<f64> = fit_bounding_volume(&sphere, Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0), 7, 0.5);
        assert!(deep.volume() <= shallow.volume() + 1e-9);
    }
}
