//! The implicit-function composition layer (spec §4.6-§4.9): CSG over
//! analytic primitives, transforms, BVH-accelerated aggregate union, an
//! octree bounding-volume fitter, and mesh-SDF adapters.
//!
//! Per spec §9's Design Notes ("prefer static dispatch for the hot-path
//! types ... dynamic dispatch only for the implicit-function composition
//! layer"), composition nodes hold `Box<dyn ImplicitFunction<T>>` children
//! while `Vec3`, the BVH, and the DCEL stay fully generic.
pub mod csg;
pub mod fast_union;
pub mod mesh_sdf;
pub mod octree;
pub mod primitives;
pub mod transform;

use cgmath::BaseFloat;

use crate::space::Vec3;

/// A value-only query over 3-space: `value(p) -> T`. Implemented by
/// analytic primitives, CSG composition nodes, transforms, and mesh
/// adapters alike (spec §3, "Implicit function").
pub trait ImplicitFunction<T: BaseFloat> {
    fn value(&self, p: Vec3<T>) -> T;
}

/// Every implicit function can be queried as `signed_distance`, equal to
/// `value` by definition (spec §6: "`signed_distance(point)` equal to
/// `value` for true distance fields"). Only primitives and meshes actually
/// satisfy the Lipschitz bound that makes the result a true distance; CSG
/// and transform nodes forward the same number without re-deriving it.
pub trait SignedDistance<T: BaseFloat>: ImplicitFunction<T> {
    fn signed_distance(&self, p: Vec3<T>) -> T {
        self.value(p)
    }
}

impl<T: BaseFloat, F: ImplicitFunction<T> + ?Sized> SignedDistance<T> for F {}

pub use csg::{ Complement, Difference, Intersection, SmoothDifference, SmoothIntersection, SmoothKind, SmoothUnion, Union };
pub use fast_union::{ BoundedPrimitive, FastSmoothUnionIF, FastUnionIF };
pub use mesh_sdf::{ FastCompactMeshSDF, FastMeshSDF, MeshSDF };
pub use octree::fit_bounding_volume;
pub use primitives::{ Capsule, Cone, Cuboid, Cylinder, Plane, Sphere, Torus };
pub use transform::{ Annular, Blur, Elongate, Mollify, Rotate, Scale, Translate };
