//! Fixed-size vector algebra shared by every other module in the kernel.
//!
//! Mirrors how `lasgun::space` re-exports `cgmath` aliases rather than
//! hand-rolling a vector type, but keeps a single `Vec3`/`Vec2` alias per the
//! kernel's data model (the source material uses one vector type for both
//! positions and displacements, never a separate point type).
pub use cgmath::prelude::*;
use cgmath::{ BaseFloat, Vector2, Vector3 };

pub mod bounds;
pub mod sphere;
pub mod bounding_volume;

pub use self::bounds::Aabb;
pub use self::sphere::BoundingSphere;
pub use self::bounding_volume::BoundingVolume;

/// A 3-component vector over scalar type `T`, used for positions, normals
/// and displacements alike.
pub type Vec3<T> = Vector3<T>;

/// A 2-component vector, used for the DCEL's per-face 2D projection.
pub type Vec2<T> = Vector2<T>;

/// Extra constructors and component-wise queries the spec's Data Model
/// names that `cgmath::Vector3` doesn't provide directly.
pub trait Vec3Ext<T: BaseFloat> {
    /// The unit vector along axis `d` (0 = x, 1 = y, 2 = z).
    fn unit(d: usize) -> Self;

    /// A vector with every component set to the largest finite value of `T`.
    fn max_value() -> Self;

    /// A vector with every component set to the smallest finite value of `T`.
    fn min_value() -> Self;

    /// A vector with every component set to `T`'s positive infinity.
    fn infinity() -> Self;

    /// Index of the component with the smallest value (ties favour the
    /// earlier axis).
    fn min_dir(&self) -> usize;

    /// Index of the component with the largest value (ties favour the
    /// earlier axis).
    fn max_dir(&self) -> usize;

    /// Index of the component with the smallest magnitude.
    fn min_abs_dir(&self) -> usize;

    /// Index of the component with the largest magnitude.
    fn max_abs_dir(&self) -> usize;

    /// Componentwise absolute value.
    fn abs(&self) -> Self;

    /// Componentwise minimum of two vectors.
    fn componentwise_min(&self, other: &Self) -> Self;

    /// Componentwise maximum of two vectors.
    fn componentwise_max(&self, other: &Self) -> Self;
}

impl<T: BaseFloat> Vec3Ext<T> for Vec3<T> {
    #[inline]
    fn unit(d: usize) -> Self {
        debug_assert!(d < 3);
        match d {
            0 => Vec3::new(T::one(), T::zero(), T::zero()),
            1 => Vec3::new(T::zero(), T::one(), T::zero()),
            _ => Vec3::new(T::zero(), T::zero(), T::one()),
        }
    }

    #[inline]
    fn max_value() -> Self {
        let m = T::max_value();
        Vec3::new(m, m, m)
    }

    #[inline]
    fn min_value() -> Self {
        let m = T::min_value();
        Vec3::new(m, m, m)
    }

    #[inline]
    fn infinity() -> Self {
        let inf = T::infinity();
        Vec3::new(inf, inf, inf)
    }

    #[inline]
    fn min_dir(&self) -> usize {
        if self.x <= self.y && self.x <= self.z { 0 }
        else if self.y <= self.z { 1 }
        else { 2 }
    }

    #[inline]
    fn max_dir(&self) -> usize {
        if self.x >= self.y && self.x >= self.z { 0 }
        else if self.y >= self.z { 1 }
        else { 2 }
    }

    #[inline]
    fn min_abs_dir(&self) -> usize {
        self.abs().min_dir()
    }

    #[inline]
    fn max_abs_dir(&self) -> usize {
        self.abs().max_dir()
    }

    #[inline]
    fn abs(&self) -> Self {
        Vec3::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[inline]
    fn componentwise_min(&self, other: &Self) -> Self {
        Vec3::new(min(self.x, other.x), min(self.y, other.y), min(self.z, other.z))
    }

    #[inline]
    fn componentwise_max(&self, other: &Self) -> Self {
        Vec3::new(max(self.x, other.x), max(self.y, other.y), max(self.z, other.z))
    }
}

#[inline]
pub fn lerp<T: BaseFloat>(t: T, a: T, b: T) -> T {
    a * (T::one() - t) + t * b
}

#[inline]
pub fn min<T: BaseFloat>(a: T, b: T) -> T {
    if a < b { a } else { b }
}

#[inline]
pub fn max<T: BaseFloat>(a: T, b: T) -> T {
    if a > b { a } else { b }
}

/// Clamp `v` to `[lo, hi]`.
#[inline]
pub fn clamp<T: BaseFloat>(v: T, lo: T, hi: T) -> T {
    max(lo, min(hi, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_algebra_identities() {
        let u: Vec3<f64> = Vec3::new(1.0, 2.0, 3.0);
        let v: Vec3<f64> = Vec3::new(-2.0, 0.5, 4.0);
        let w: Vec3<f64> = Vec3::new(3.0, -1.0, 2.0);

        assert_eq!(u + v, v + u);
        assert_eq!((u + v) + w, u + (v + w));
        assert!((u.dot(v) - v.dot(u)).abs() < 1e-12);
        assert_eq!(u.cross(v), -(v.cross(u)));
        assert!((u.magnitude2() - u.dot(u)).abs() < 1e-12);
    }

    #[test]
    fn unit_and_dirs() {
        let x: Vec3<f64> = Vec3::unit(0);
        assert_eq!(x, Vec3::new(1.0, 0.0, 0.0));

        let v: Vec3<f64> = Vec3::new(-5.0, 1.0, 2.0);
        assert_eq!(v.max_dir(), 2); // largest component (2.0) is at index 2
        assert_eq!(v.min_dir(), 0);
        assert_eq!(v.max_abs_dir(), 0); // largest magnitude (5.0) is at index 0
    }
}
