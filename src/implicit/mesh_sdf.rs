//! Mesh-SDF adapters (spec §4.9): `MeshSDF` forwards queries straight to
//! the mesh-level signed distance; `FastMeshSDF`/`FastCompactMeshSDF` wrap a
//! BVH over the mesh's faces (build-tree and flat respectively) so a query
//! only evaluates the faces its bounding volumes couldn't prune. Both Fast
//! variants also expose a k-nearest-faces query and a pairwise
//! face-intersection query against another mesh.
use std::cmp::Ordering;

use cgmath::BaseFloat;

use crate::bvh::{ BuildStrategy, BuildNode, LinearBvh };
use crate::dcel::{ face_signed_distance, mesh_signed_distance, Face, FaceId, InsideTest, Mesh };
use crate::space::{ BoundingVolume, Vec3 };
use super::ImplicitFunction;

/// Enclose a face's vertices in a bounding volume, the BV a [`FastMeshSDF`]
/// or [`FastCompactMeshSDF`] keys its BVH leaves by.
fn face_bounding_volume<T: BaseFloat, M: Clone, BV: BoundingVolume<T>>(mesh: &Mesh<T, M>, face_id: FaceId) -> BV {
    let positions: Vec<Vec3<T>> = mesh
        .face_half_edges(face_id)
        .iter()
        .map(|&h| mesh.vertex(mesh.half_edge(h).origin).position)
        .collect();
    BV::from_points(&positions)
}

/// Replace `best` with `candidate` when `candidate` is closer in magnitude
/// (spec §4.9: "`best_so_far` is tracked as a signed value where
/// replacement is by magnitude").
fn closer_by_magnitude<T: BaseFloat>(best: T, candidate: T) -> T {
    if candidate.abs() < best.abs() { candidate } else { best }
}

/// `MeshSDF`: owns a DCEL mesh and forwards queries to the mesh-level
/// signed distance, evaluating every face (spec §4.9).
pub struct MeshSDF<T: BaseFloat, M: Clone = ()> {
    mesh: Mesh<T, M>,
    test: InsideTest,
}

impl<T: BaseFloat, M: Clone> MeshSDF<T, M> {
    pub fn new(mesh: Mesh<T, M>) -> Self {
        MeshSDF { mesh, test: InsideTest::default() }
    }

    pub fn with_inside_test(mesh: Mesh<T, M>, test: InsideTest) -> Self {
        MeshSDF { mesh, test }
    }

    pub fn mesh(&self) -> &Mesh<T, M> {
        &self.mesh
    }
}

impl<T: BaseFloat, M: Clone> ImplicitFunction<T> for MeshSDF<T, M> {
    fn value(&self, p: Vec3<T>) -> T {
        mesh_signed_distance(&self.mesh, p, self.test)
    }
}

/// Max-heap entry for a bounded k-nearest search: ordered by distance so a
/// [`std::collections::BinaryHeap`] pops the *farthest* kept candidate
/// first, the one to evict when a closer face is found.
struct HeapEntry<T> {
    distance: T,
    face: FaceId,
}

impl<T: BaseFloat> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}
impl<T: BaseFloat> Eq for HeapEntry<T> {}
impl<T: BaseFloat> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: BaseFloat> Ord for HeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.partial_cmp(&other.distance).unwrap_or(Ordering::Equal)
    }
}

/// `FastMeshSDF<T, M, BV, K>`: a build-tree BVH over a mesh's faces (spec
/// §4.9). The query pattern mirrors [`super::FastUnionIF`]'s, but the
/// per-leaf update rule is the per-face signed distance and the running
/// best is kept by magnitude, not raw minimum.
pub struct FastMeshSDF<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> {
    mesh: Mesh<T, M>,
    bvh: BuildNode<T, FaceId, BV, K>,
    test: InsideTest,
}

impl<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> FastMeshSDF<T, M, BV, K> {
    pub fn build(mesh: Mesh<T, M>, strategy: BuildStrategy, report: &mut crate::error::SanityReport) -> Self {
        let items: Vec<(FaceId, BV)> = mesh.face_ids().map(|f| (f, face_bounding_volume(&mesh, f))).collect();
        let bvh = match strategy {
            BuildStrategy::TopDown => BuildNode::build_top_down(items, &|_| false, report),
            BuildStrategy::Morton => BuildNode::build_morton(items),
            BuildStrategy::Nested => BuildNode::build_nested(items),
        };
        FastMeshSDF { mesh, bvh, test: InsideTest::default() }
    }

    pub fn mesh(&self) -> &Mesh<T, M> {
        &self.mesh
    }

    /// The `k` faces whose bounding volumes are nearest to `p`, sorted by
    /// ascending BV distance (spec §4.9: "a k-nearest-faces query").
    pub fn k_nearest_faces(&self, p: Vec3<T>, k: usize) -> Vec<(FaceId, T)> {
        use std::collections::BinaryHeap;
        let mut heap: BinaryHeap<HeapEntry<T>> = BinaryHeap::with_capacity(k + 1);

        self.bvh.traverse(
            &mut |node| node.bv.distance(p),
            &mut |_node, &bv_dist| k == 0 || heap.len() < k || bv_dist <= heap.peek().unwrap().distance,
            &mut |entries| entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal)),
            &mut |faces| {
                for &(face, bv) in faces {
                    let d = bv.distance(p);
                    if k == 0 {
                        continue;
                    }
                    if heap.len() < k {
                        heap.push(HeapEntry { distance: d, face });
                    } else if d < heap.peek().unwrap().distance {
                        heap.pop();
                        heap.push(HeapEntry { distance: d, face });
                    }
                }
            },
        );

        let mut out: Vec<(FaceId, T)> = heap.into_iter().map(|e| (e.face, e.distance)).collect();
        out.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        out
    }

    /// Pairwise face-intersection query against another mesh-SDF's BVH,
    /// pruned by bounding-volume overlap and decided by a caller-supplied
    /// face-face intersection test (spec §4.9: used to detect
    /// self-intersections when `other` is the same mesh).
    pub fn intersecting_faces(
        &self,
        other: &FastMeshSDF<T, M, BV, K>,
        face_test: impl Fn(&Face<T, M>, &Face<T, M>) -> bool,
    ) -> Vec<(FaceId, FaceId)> {
        let mut out = Vec::new();
        for &(face_a, bv_a) in all_primitives(&self.bvh).iter() {
            other.bvh.traverse(
                &mut |node| node.bv.intersects(&bv_a),
                &mut |_node, &hit| hit,
                &mut |_entries| {},
                &mut |faces| {
                    for &(face_b, bv_b) in faces {
                        if bv_a.intersects(&bv_b) && face_test(self.mesh.face(face_a), other.mesh.face(face_b)) {
                            out.push((face_a, face_b));
                        }
                    }
                },
            );
        }
        out
    }
}

/// Collect every primitive a build tree owns by walking it with a visit
/// predicate that always descends (spec §9's Design Notes: the same
/// four-callback `traverse` contract serves this as readily as pruned
/// queries). Used by [`FastMeshSDF::intersecting_faces`], which needs to
/// enumerate `self`'s faces directly rather than prune against a query point.
fn all_primitives<T: BaseFloat, P: Clone, BV: BoundingVolume<T>, const K: usize>(
    root: &BuildNode<T, P, BV, K>,
) -> Vec<(P, BV)> {
    let mut out = Vec::new();
    root.traverse(
        &mut |_node| (),
        &mut |_node, _meta| true,
        &mut |_entries| {},
        &mut |items| out.extend(items.iter().cloned()),
    );
    out
}

impl<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> ImplicitFunction<T> for FastMeshSDF<T, M, BV, K> {
    fn value(&self, p: Vec3<T>) -> T {
        let mut best = T::infinity();

        self.bvh.traverse(
            &mut |node| node.bv.distance(p),
            &mut |_node, &bv_dist| bv_dist <= T::zero() || bv_dist <= best.abs(),
            &mut |entries| entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal)),
            &mut |faces| {
                for &(face, _bv) in faces {
                    let d = face_signed_distance(&self.mesh, face, p, self.test);
                    best = closer_by_magnitude(best, d);
                }
            },
        );

        best
    }
}

/// `FastCompactMeshSDF<T, M, BV, K>`: the flat-BVH twin of [`FastMeshSDF`],
/// built once the face layout is finalised (spec §4.9).
pub struct FastCompactMeshSDF<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> {
    mesh: Mesh<T, M>,
    bvh: LinearBvh<T, FaceId, BV, K>,
    test: InsideTest,
}

impl<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> FastCompactMeshSDF<T, M, BV, K> {
    pub fn build(mesh: Mesh<T, M>, strategy: BuildStrategy, report: &mut crate::error::SanityReport) -> Self {
        let items: Vec<(FaceId, BV)> = mesh.face_ids().map(|f| (f, face_bounding_volume(&mesh, f))).collect();
        let build = match strategy {
            BuildStrategy::TopDown => BuildNode::build_top_down(items, &|_| false, report),
            BuildStrategy::Morton => BuildNode::build_morton(items),
            BuildStrategy::Nested => BuildNode::build_nested(items),
        };
        FastCompactMeshSDF { mesh, bvh: LinearBvh::build(build), test: InsideTest::default() }
    }

    pub fn from_fast(fast: FastMeshSDF<T, M, BV, K>) -> Self {
        FastCompactMeshSDF { mesh: fast.mesh, bvh: LinearBvh::build(fast.bvh), test: fast.test }
    }

    pub fn mesh(&self) -> &Mesh<T, M> {
        &self.mesh
    }

    pub fn k_nearest_faces(&self, p: Vec3<T>, k: usize) -> Vec<(FaceId, T)> {
        use std::collections::BinaryHeap;
        let mut heap: BinaryHeap<HeapEntry<T>> = BinaryHeap::with_capacity(k + 1);

        self.bvh.traverse(
            &mut |node| node.bv.distance(p),
            &mut |_node, &bv_dist| k == 0 || heap.len() < k || bv_dist <= heap.peek().unwrap().distance,
            &mut |entries| entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal)),
            &mut |faces| {
                for &(face, bv) in faces {
                    if k == 0 {
                        continue;
                    }
                    let d = bv.distance(p);
                    if heap.len() < k {
                        heap.push(HeapEntry { distance: d, face });
                    } else if d < heap.peek().unwrap().distance {
                        heap.pop();
                        heap.push(HeapEntry { distance: d, face });
                    }
                }
            },
        );

        let mut out: Vec<(FaceId, T)> = heap.into_iter().map(|e| (e.face, e.distance)).collect();
        out.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        out
    }

    pub fn intersecting_faces(
        &self,
        other: &FastCompactMeshSDF<T, M, BV, K>,
        face_test: impl Fn(&Face<T, M>, &Face<T, M>) -> bool,
    ) -> Vec<(FaceId, FaceId)> {
        let mut out = Vec::new();
        for &(face_a, bv_a) in self.bvh.primitives() {
            other.bvh.traverse(
                &mut |node| node.bv.intersects(&bv_a),
                &mut |_node, &hit| hit,
                &mut |_entries| {},
                &mut |faces| {
                    for &(face_b, bv_b) in faces {
                        if bv_a.intersects(&bv_b) && face_test(self.mesh.face(face_a), other.mesh.face(face_b)) {
                            out.push((face_a, face_b));
                        }
                    }
                },
            );
        }
        out
    }
}

impl<T: BaseFloat, M: Clone, BV: BoundingVolume<T>, const K: usize> ImplicitFunction<T> for FastCompactMeshSDF<T, M, BV, K> {
    fn value(&self, p: Vec3<T>) -> T {
        let mut best = T::infinity();

        self.bvh.traverse(
            &mut |node| node.bv.distance(p),
            &mut |_node, &bv_dist| bv_dist <= T::zero() || bv_dist <= best.abs(),
            &mut |entries| entries.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal)),
            &mut |faces| {
                for &(face, _bv) in faces {
                    let d = face_signed_distance(&self.mesh, face, p, self.test);
                    best = closer_by_magnitude(best, d);
                }
            },
        );

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::build;
    use crate::error::SanityReport;
    use crate::soup::Soup;
    use crate::space::Aabb;

    fn tetrahedron() -> Mesh<f64, ()> {
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
    fn fast_mesh_sdf_matches_mesh_sdf_everywhere() {
        let mut report = SanityReport::new();
        let mesh_for_slow = tetrahedron();
        let slow = MeshSDF::new(mesh_for_slow);
        let fast = FastMeshSDF::<f64, (), Aabb<f64>, 2>::build(tetrahedron(), BuildStrategy::TopDown, &mut report);

        for p in [
            Vec3::new(0.25, 0.25, 0.25),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(0.1, 0.1, 5.0),
        ] {
            assert!((slow.value(p) - fast.value(p)).abs() < 1e-9, "mismatch at {:?}", p);
        }
    }

    #[test]
    fn fast_compact_mesh_sdf_matches_fast_mesh_sdf() {
        let mut report = SanityReport::new();
        let fast = FastMeshSDF::<f64, (), Aabb<f64>, 2>::build(tetrahedron(), BuildStrategy::Morton, &mut report);
        let p = Vec3::new(0.6, 0.6, 0.6);
        let expected = fast.value(p);
        let compact = FastCompactMeshSDF::from_fast(fast);
        assert!((compact.value(p) - expected).abs() < 1e-12);
    }

    #[test]
    fn k_nearest_faces_returns_k_in_ascending_order() {
        let mut report = SanityReport::new();
        let fast = FastMeshSDF::<f64, (), Aabb<f64>, 2>::build(tetrahedron(), BuildStrategy::TopDown, &mut report);
        let nearest = fast.k_nearest_faces(Vec3::new(0.25, 0.25, 0.25), 2);
        assert_eq!(nearest.len(), 2);
        assert!(nearest[0].1 <= nearest[1].1);
    }

    #[test]
    fn self_intersection_query_finds_shared_edges_as_overlapping_bvs() {
        let mut report = SanityReport::new();
        let fast = FastMeshSDF::<f64, (), Aabb<f64>, 2>::build(tetrahedron(), BuildStrategy::TopDown, &mut report);
        let fast2 = FastMeshSDF::<f64, (), Aabb<f64>, 2>::build(tetrahedron(), BuildStrategy::TopDown, &mut SanityReport::new());
        let pairs = fast.intersecting_faces(&fast2, |_a, _b| true);
        // Every face of a tetrahedron shares a bounding-box corner with every other.
        assert!(pairs.len() >= fast.mesh().face_count());
    }
}
