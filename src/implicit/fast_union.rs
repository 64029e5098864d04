//! BVH-accelerated implicit-function union (spec §4.7): `FastUnionIF` and
//! `FastSmoothUnionIF` hold a [`LinearBvh`] over implicit-function
//! primitives and prune the traversal using each subtree's bounding-volume
//! distance to the query point, the same `traverse` contract
//! [`crate::bvh::build::BuildNode`] exposes (spec §9's Design Notes single
//! out this abstraction for reuse across exactly this kind of query).
use cgmath::BaseFloat;

use crate::bvh::{ BuildStrategy, BuildNode, LinearBvh };
use crate::space::{ min, BoundingVolume, Vec3 };
use super::csg::{ smooth_min, SmoothKind };
use super::ImplicitFunction;

/// A primitive usable as a BVH leaf in a fast union: any implicit function
/// paired with a caller-supplied, conservative bounding volume (spec §9's
/// Open Questions: "Clients are expected to supply conservative BVs; the
/// core does not verify").
pub trait BoundedPrimitive<T: BaseFloat, BV: BoundingVolume<T>>: ImplicitFunction<T> {
    fn bounding_volume(&self) -> BV;
}

fn build_bvh<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize>(
    primitives: Vec<P>,
    strategy: BuildStrategy,
    report: &mut crate::error::SanityReport,
) -> LinearBvh<T, P, BV, K>
where
    P: BoundedPrimitive<T, BV>,
{
    let items: Vec<(P, BV)> = primitives.into_iter().map(|p| { let bv = p.bounding_volume(); (p, bv) }).collect();
    let build = match strategy {
        BuildStrategy::TopDown => BuildNode::build_top_down(items, &|_| false, report),
        BuildStrategy::Morton => BuildNode::build_morton(items),
        BuildStrategy::Nested => BuildNode::build_nested(items),
    };
    LinearBvh::build(build)
}

/// `FastUnionIF<T, P, BV, K>`: `value(p) = min_i v_i(p)` over many
/// implicit-function primitives, computed by pruning the BVH instead of
/// evaluating every primitive (spec §4.7).
pub struct FastUnionIF<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize>
where
    P: BoundedPrimitive<T, BV>,
{
    bvh: LinearBvh<T, P, BV, K>,
}

impl<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> FastUnionIF<T, P, BV, K>
where
    P: BoundedPrimitive<T, BV>,
{
    pub fn build(primitives: Vec<P>, strategy: BuildStrategy, report: &mut crate::error::SanityReport) -> Self {
        FastUnionIF { bvh: build_bvh(primitives, strategy, report) }
    }

    pub fn primitive_count(&self) -> usize {
        self.bvh.primitives().len()
    }
}

impl<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> ImplicitFunction<T> for FastUnionIF<T, P, BV, K>
where
    P: BoundedPrimitive<T, BV>,
{
    fn value(&self, p: Vec3<T>) -> T {
        let mut best = T::infinity();

        self.bvh.traverse(
            // meta_updater: the subtree's BV distance to the query point.
            &mut |node| node.bv.distance(p),
            // visiter: descend if the point is inside this subtree's BV
            // (a closer primitive may lie on the far side of it) or if the
            // BV distance still undercuts the current best (spec §4.7:
            // "Both forms are needed").
            &mut |_node, &bv_dist| bv_dist <= T::zero() || bv_dist <= best,
            // sorter: visit the farthest subtree first so that, since the
            // traversal pops a stack, the nearest is popped (and prunes)
            // soonest.
            &mut |entries| entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal)),
            &mut |leaf_primitives| {
                for (prim, _bv) in leaf_primitives {
                    best = min(best, prim.value(p));
                }
            },
        );

        best
    }
}

/// `FastSmoothUnionIF`: like [`FastUnionIF`] but tracks the **two**
/// smallest values seen across the whole traversal and returns
/// `smoothMin` of them at the end (spec §4.7). The visit predicate keeps
/// any subtree whose BV distance is `<=` either of the two running
/// smallest values, since the second-smallest can still improve.
pub struct FastSmoothUnionIF<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize>
where
    P: BoundedPrimitive<T, BV>,
{
    bvh: LinearBvh<T, P, BV, K>,
    smoothing: T,
    kind: SmoothKind,
}

impl<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> FastSmoothUnionIF<T, P, BV, K>
where
    P: BoundedPrimitive<T, BV>,
{
    pub fn build(
        primitives: Vec<P>,
        strategy: BuildStrategy,
        smoothing: T,
        kind: SmoothKind,
        report: &mut crate::error::SanityReport,
    ) -> Self {
        FastSmoothUnionIF { bvh: build_bvh(primitives, strategy, report), smoothing, kind }
    }
}

impl<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> ImplicitFunction<T> for FastSmoothUnionIF<T, P, BV, K>
where
    P: BoundedPrimitive<T, BV>,
{
    fn value(&self, p: Vec3<T>) -> T {
        let (mut a, mut b) = (T::infinity(), T::infinity());

        self.bvh.traverse(
            &mut |node| node.bv.distance(p),
            &mut |_node, &bv_dist| bv_dist <= T::zero() || bv_dist <= a || bv_dist <= b,
            &mut |entries| entries.sort_by(|(_, x), (_, y)| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal)),
            &mut |leaf_primitives| {
                for (prim, _bv) in leaf_primitives {
                    let v = prim.value(p);
                    if v < a {
                        b = a;
                        a = v;
                    } else if v < b {
                        b = v;
                    }
                }
            },
        );

        smooth_min(a, b, self.smoothing, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanityReport;
    use crate::implicit::Sphere;
    use crate::space::Aabb;

    struct BoundedSphere(Sphere<f64>);

    impl ImplicitFunction<f64> for BoundedSphere {
        fn value(&self, p: Vec3<f64>) -> f64 {
            self.0.value(p)
        }
    }

    impl BoundedPrimitive<f64, Aabb<f64>> for BoundedSphere {
        fn bounding_volume(&self) -> Aabb<f64> {
            self.0.aabb()
        }
    }

    fn spheres_along_x(n: usize) -> Vec<BoundedSphere> {
        (0..n)
            .map(|i| BoundedSphere(Sphere::new(Vec3::new((i as f64) * 5.0, 0.0, 0.0), 1.0)))
            .collect()
    }

    #[test]
    fn fast_union_matches_brute_force_minimum() {
        let prims = spheres_along_x(12);
        let brute: Vec<Sphere<f64>> = prims.iter().map(|b| b.0).collect();

        let mut report = SanityReport::new();
        let fast = FastUnionIF::<f64, BoundedSphere, Aabb<f64>, 4>::build(prims, BuildStrategy::TopDown, &mut report);

        for x in [-3.0, 0.5, 2.4, 17.0, 42.0, 55.5] {
            let p = Vec3::new(x, 0.3, -0.1);
            let expected = brute.iter().fold(f64::INFINITY, |acc, s| acc.min(s.value(p)));
            let got = fast.value(p);
            assert!((got - expected).abs() < 1e-9, "x={} expected {} got {}", x, expected, got);
        }
    }

    #[test]
    fn two_unit_spheres_union_matches_the_end_to_end_scenario() {
        let prims = vec![
            BoundedSphere(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0)),
            BoundedSphere(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0)),
        ];
        let mut report = SanityReport::new();
        let fast = FastUnionIF::<f64, BoundedSphere, Aabb<f64>, 2>::build(prims, BuildStrategy::Morton, &mut report);
        assert!((fast.value(Vec3::new(0.0, 0.0, 0.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fast_smooth_union_matches_brute_force_two_smallest() {
        let prims = spheres_along_x(8);
        let brute: Vec<Sphere<f64>> = prims.iter().map(|b| b.0).collect();

        let mut report = SanityReport::new();
        let fast = FastSmoothUnionIF::<f64, BoundedSphere, Aabb<f64>, 4>::build(
            prims, BuildStrategy::Nested, 1.0, SmoothKind::Polynomial, &mut report,
        );

        for x in [-3.0, 2.0, 12.0, 30.0] {
            let p = Vec3::new(x, 0.0, 0.0);
            let mut values: Vec<f64> = brute.iter().map(|s| s.value(p)).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let expected = smooth_min(values[0], values[1], 1.0, SmoothKind::Polynomial);
            assert!((fast.value(p) - expected).abs() < 1e-9);
        }
    }
}
