//! Axis-aligned bounding box, adapted from `lasgun::space::bounds::Bounds3`
//! (same `lo`/`hi` corner pair and componentwise-min/max plumbing) and
//! generalised with the distance/overlap queries the BVH needs.
use cgmath::BaseFloat;
use super::{ Vec3, Vec3Ext, min, max, clamp };
use super::bounding_volume::BoundingVolume;

/// Axis-aligned bounding box: a pair `(lo, hi)` with `lo[d] <= hi[d]` on
/// every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb<T: BaseFloat> {
    pub lo: Vec3<T>,
    pub hi: Vec3<T>,
}

impl<T: BaseFloat> Aabb<T> {
    /// The empty box: any union with it is a no-op, any point's distance to
    /// it is `+infinity`. Used as the fold seed when building from scratch.
    #[inline]
    pub fn empty() -> Self {
        Aabb { lo: Vec3::max_value(), hi: Vec3::min_value() }
    }

    #[inline]
    pub fn new(lo: Vec3<T>, hi: Vec3<T>) -> Self {
        Aabb {
            lo: lo.componentwise_min(&hi),
            hi: lo.componentwise_max(&hi),
        }
    }

    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Aabb {
            lo: self.lo.componentwise_min(&other.lo),
            hi: self.hi.componentwise_max(&other.hi),
        }
    }

    #[inline]
    pub fn union_point(&self, p: Vec3<T>) -> Self {
        Aabb {
            lo: self.lo.componentwise_min(&p),
            hi: self.hi.componentwise_max(&p),
        }
    }

    #[inline]
    pub fn diagonal(&self) -> Vec3<T> {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, p: Vec3<T>) -> bool {
        p.x >= self.lo.x && p.x <= self.hi.x &&
        p.y >= self.lo.y && p.y <= self.hi.y &&
        p.z >= self.lo.z && p.z <= self.hi.z
    }

    /// Index of the axis along which this box is widest.
    #[inline]
    pub fn maximum_extent(&self) -> usize {
        self.diagonal().max_dir()
    }

    /// Map a point into `[0, 1]^3` relative to this box (used by the
    /// space-filling-curve grid normalisation in `crate::sfc`).
    #[inline]
    pub fn offset(&self, p: Vec3<T>) -> Vec3<T> {
        let d = self.diagonal();
        let o = p - self.lo;
        Vec3::new(
            if d.x > T::zero() { o.x / d.x } else { T::zero() },
            if d.y > T::zero() { o.y / d.y } else { T::zero() },
            if d.z > T::zero() { o.z / d.z } else { T::zero() },
        )
    }
}

impl<T: BaseFloat> BoundingVolume<T> for Aabb<T> {
    fn from_points(points: &[Vec3<T>]) -> Self {
        points.iter().fold(Aabb::empty(), |b, &p| b.union_point(p))
    }

    fn from_volumes(volumes: &[Self]) -> Self {
        volumes.iter().fold(Aabb::empty(), |b, v| b.union(v))
    }

    #[inline]
    fn centroid(&self) -> Vec3<T> {
        let half = T::one() / (T::one() + T::one());
        self.lo + self.diagonal() * half
    }

    #[inline]
    fn volume(&self) -> T {
        let d = self.diagonal();
        max(d.x, T::zero()) * max(d.y, T::zero()) * max(d.z, T::zero())
    }

    #[inline]
    fn area(&self) -> T {
        let d = self.diagonal();
        let two = T::one() + T::one();
        two * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    #[inline]
    fn intersects(&self, other: &Self) -> bool {
        self.lo.x <= other.hi.x && self.hi.x >= other.lo.x &&
        self.lo.y <= other.hi.y && self.hi.y >= other.lo.y &&
        self.lo.z <= other.hi.z && self.hi.z >= other.lo.z
    }

    /// Euclidean distance from `p` to the box, via per-axis clamping: zero
    /// inside, otherwise the length of the vector from `p` to its closest
    /// point on the box.
    fn distance(&self, p: Vec3<T>) -> T {
        let cx = clamp(p.x, self.lo.x, self.hi.x);
        let cy = clamp(p.y, self.lo.y, self.hi.y);
        let cz = clamp(p.z, self.lo.z, self.hi.z);
        let dx = p.x - cx;
        let dy = p.y - cy;
        let dz = p.z - cz;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Product of per-axis clamped overlaps.
    fn overlapping_volume(&self, other: &Self) -> T {
        let ox = max(T::zero(), min(self.hi.x, other.hi.x) - max(self.lo.x, other.lo.x));
        let oy = max(T::zero(), min(self.hi.y, other.hi.y) - max(self.lo.y, other.lo.y));
        let oz = max(T::zero(), min(self.hi.z, other.hi.z) - max(self.lo.z, other.lo.z));
        ox * oy * oz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encloses_its_own_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, -1.0),
            Vec3::new(-3.0, 0.5, 4.0),
        ];
        let b = Aabb::from_points(&pts);
        for &p in &pts {
            assert!(b.distance(p) < 1e-12, "box must enclose its generating points");
        }
    }

    #[test]
    fn distance_is_lower_bound() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let p = Vec3::new(2.0, 2.0, 0.0);
        assert!((b.distance(p) - 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(b.distance(Vec3::new(0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn volume_and_union() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a.volume(), 1.0);

        let u = a.union(&b);
        assert!(u.contains(a.lo) && u.contains(a.hi));
        assert!(u.contains(b.lo) && u.contains(b.hi));
    }

    #[test]
    fn overlapping_volume_of_disjoint_boxes_is_zero() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0));
        assert_eq!(a.overlapping_volume(&b), 0.0);
    }
}
