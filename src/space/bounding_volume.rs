//! The contract every bounding-volume type must satisfy (spec §4.1).
use cgmath::BaseFloat;
use super::Vec3;

/// A bounding volume over 3-space points. Implemented by [`super::Aabb`] and
/// [`super::BoundingSphere`], and required of the `BV` type parameter
/// threaded through the BVH.
///
/// `distance` must be a **lower bound** on the distance from `p` to any
/// primitive enclosed by the volume: this is what makes BVH pruning sound.
/// A `BV` whose `distance` doesn't satisfy that bound is a logic error in the
/// caller, not something this trait can check (spec §4.10, `NumericEdge`
/// aside).
pub trait BoundingVolume<T: BaseFloat>: Copy + Clone {
    /// Enclose a set of points.
    fn from_points(points: &[Vec3<T>]) -> Self;

    /// Enclose a set of other bounding volumes of the same kind.
    fn from_volumes(volumes: &[Self]) -> Self;

    fn centroid(&self) -> Vec3<T>;
    fn volume(&self) -> T;
    fn area(&self) -> T;

    fn intersects(&self, other: &Self) -> bool;

    /// Zero if `p` is inside; otherwise the shortest Euclidean distance from
    /// `p` to the volume's surface.
    fn distance(&self, p: Vec3<T>) -> T;

    /// Closed-form volume of the intersection of two bounding volumes of the
    /// same kind.
    fn overlapping_volume(&self, other: &Self) -> T;

    fn contains_point(&self, p: Vec3<T>) -> bool {
        self.distance(p) <= T::zero()
    }
}
