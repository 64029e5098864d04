//! A header-only-in-spirit computational-geometry kernel for constructing
//! and querying signed distance functions and implicit surfaces over
//! three-dimensional space (spec §1). Clients are embedded-boundary /
//! cut-cell PDE solvers that need, at every grid point near a surface, the
//! signed distance to that surface: negative inside, positive outside.
//!
//! The three tightly coupled subsystems:
//! - [`bvh`]: a bounding volume hierarchy over heterogeneous primitives,
//!   in both a pointer-based build representation ([`bvh::BuildNode`]) and
//!   a flattened, cache-friendly traversal representation
//!   ([`bvh::LinearBvh`]).
//! - [`dcel`]: a doubly-connected edge list surface mesh with exact
//!   signed-distance queries against an arbitrary closed triangulated
//!   surface.
//! - [`implicit`]: constructive solid geometry over analytic primitives
//!   and meshes, optionally accelerated by the BVH.
pub mod bvh;
pub mod dcel;
pub mod error;
pub mod implicit;
pub mod sfc;
pub mod soup;
pub mod space;

pub use error::{ Diagnostic, SanityReport };
pub use soup::{ Facet, Soup };
pub use space::{ Aabb, BoundingSphere, BoundingVolume, Vec2, Vec3 };

use cgmath::BaseFloat;

use dcel::Mesh;

/// Build a half-edge [`dcel::Mesh`] from a vertex/facet soup (spec §6:
/// "Soup-to-mesh builder returning a mesh handle"). Degenerate facets and
/// topology problems are recorded on `report` rather than aborting the
/// build.
pub fn build_mesh<T: BaseFloat, M: Clone>(soup: &Soup<T>, report: &mut SanityReport) -> Mesh<T, M> {
    dcel::build(soup, report)
}
