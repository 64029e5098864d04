//! Analytic primitives (spec §3: "sphere, box, plane, torus, cone,
//! cylinder, capsule"; spec §4.6's value table covers Sphere/Box/Plane
//! exactly; the remaining four are named only as primitive kinds, so
//! their formulas follow the standard closed-form SDFs, each centred on
//! an explicit origin and aligned to the y-axis; arbitrary pose comes from
//! composing with [`super::Rotate`]/[`super::Translate`] rather than
//! baking an orientation into the primitive itself, the same division of
//! labour `Cuboid` and the other `lasgun::shape` types use between shape
//! data and the transform that places them in the scene.
use cgmath::prelude::*;
use cgmath::BaseFloat;

use crate::space::{ max, min, Aabb, Vec3, Vec3Ext };
use super::ImplicitFunction;

/// `Sphere(c,r)`: `‖p−c‖ − r` (spec §4.6).
#[derive(Debug, Copy, Clone)]
pub struct Sphere<T: BaseFloat> {
    pub center: Vec3<T>,
    pub radius: T,
}

impl<T: BaseFloat> Sphere<T> {
    pub fn new(center: Vec3<T>, radius: T) -> Self {
        Sphere { center, radius }
    }

    pub fn aabb(&self) -> Aabb<T> {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::new(self.center - r, self.center + r)
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Sphere<T> {
    fn value(&self, p: Vec3<T>) -> T {
        (p - self.center).magnitude() - self.radius
    }
}

/// `Box(lo,hi)`: the standard box SDF, positive outside and negative
/// inside (spec §4.6). Named `Cuboid` to avoid colliding with `std::Box`.
#[derive(Debug, Copy, Clone)]
pub struct Cuboid<T: BaseFloat> {
    pub lo: Vec3<T>,
    pub hi: Vec3<T>,
}

impl<T: BaseFloat> Cuboid<T> {
    pub fn new(lo: Vec3<T>, hi: Vec3<T>) -> Self {
        Cuboid { lo, hi }
    }

    pub fn aabb(&self) -> Aabb<T> {
        Aabb::new(self.lo, self.hi)
    }

    fn center(&self) -> Vec3<T> {
        (self.lo + self.hi) / T::from(2.0).unwrap()
    }

    fn half_extents(&self) -> Vec3<T> {
        (self.hi - self.lo) / T::from(2.0).unwrap()
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Cuboid<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let q = (p - self.center()).abs() - self.half_extents();
        let outside = Vec3::new(max(q.x, T::zero()), max(q.y, T::zero()), max(q.z, T::zero())).magnitude();
        let inside = min(max(q.x, max(q.y, q.z)), T::zero());
        outside + inside
    }
}

/// `Plane(p0,n)`: `n·(p − p0)` (spec §4.6). `n` is taken as given; callers
/// are responsible for normalising it if they need a true distance field.
#[derive(Debug, Copy, Clone)]
pub struct Plane<T: BaseFloat> {
    pub point: Vec3<T>,
    pub normal: Vec3<T>,
}

impl<T: BaseFloat> Plane<T> {
    pub fn new(point: Vec3<T>, normal: Vec3<T>) -> Self {
        Plane { point, normal }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Plane<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.normal.dot(p - self.point)
    }
}

/// A torus centred at `center`, lying in the xz-plane, with major radius
/// `major_radius` (ring radius) and minor radius `minor_radius` (tube
/// radius).
#[derive(Debug, Copy, Clone)]
pub struct Torus<T: BaseFloat> {
    pub center: Vec3<T>,
    pub major_radius: T,
    pub minor_radius: T,
}

impl<T: BaseFloat> Torus<T> {
    pub fn new(center: Vec3<T>, major_radius: T, minor_radius: T) -> Self {
        Torus { center, major_radius, minor_radius }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Torus<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let q = p - self.center;
        let ring_dist = (q.x * q.x + q.z * q.z).sqrt() - self.major_radius;
        (ring_dist * ring_dist + q.y * q.y).sqrt() - self.minor_radius
    }
}

/// A cylinder centred at `center`, axis-aligned to y, with radius
/// `radius` and total height `2 * half_height`.
#[derive(Debug, Copy, Clone)]
pub struct Cylinder<T: BaseFloat> {
    pub center: Vec3<T>,
    pub radius: T,
    pub half_height: T,
}

impl<T: BaseFloat> Cylinder<T> {
    pub fn new(center: Vec3<T>, radius: T, half_height: T) -> Self {
        Cylinder { center, radius, half_height }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Cylinder<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let q = p - self.center;
        let radial = (q.x * q.x + q.z * q.z).sqrt() - self.radius;
        let axial = q.y.abs() - self.half_height;
        let outside = Vec3::new(max(radial, T::zero()), max(axial, T::zero()), T::zero());
        min(max(radial, axial), T::zero()) + (outside.x * outside.x + outside.y * outside.y).sqrt()
    }
}

/// A capped cone between `(center.y - half_height)` with radius `r1` and
/// `(center.y + half_height)` with radius `r2`, axis-aligned to y.
/// Reduces to a cylinder when `r1 == r2`.
#[derive(Debug, Copy, Clone)]
pub struct Cone<T: BaseFloat> {
    pub center: Vec3<T>,
    pub half_height: T,
    pub r1: T,
    pub r2: T,
}

impl<T: BaseFloat> Cone<T> {
    pub fn new(center: Vec3<T>, half_height: T, r1: T, r2: T) -> Self {
        Cone { center, half_height, r1, r2 }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Cone<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let q3 = p - self.center;
        let h = self.half_height;
        let qx = (q3.x * q3.x + q3.z * q3.z).sqrt();
        let qy = q3.y;

        let k1 = crate::space::Vec2::new(self.r2, h);
        let k2 = crate::space::Vec2::new(self.r2 - self.r1, T::from(2.0).unwrap() * h);

        let r_at_bottom = if qy < T::zero() { self.r1 } else { self.r2 };
        let ca = crate::space::Vec2::new(qx - min(qx, r_at_bottom), qy.abs() - h);

        let q2 = crate::space::Vec2::new(qx, qy);
        let k1_minus_q = k1 - q2;
        let t = clamp01(k1_minus_q.dot(k2) / k2.dot(k2));
        let cb = q2 - k1 + k2 * t;

        let sign = if cb.x < T::zero() && ca.y < T::zero() { -T::one() } else { T::one() };
        sign * min(ca.dot(ca), cb.dot(cb)).sqrt()
    }
}

fn clamp01<T: BaseFloat>(v: T) -> T {
    if v < T::zero() { T::zero() } else if v > T::one() { T::one() } else { v }
}

/// A capsule: the locus at distance `radius` from the segment `a -> b`.
#[derive(Debug, Copy, Clone)]
pub struct Capsule<T: BaseFloat> {
    pub a: Vec3<T>,
    pub b: Vec3<T>,
    pub radius: T,
}

impl<T: BaseFloat> Capsule<T> {
    pub fn new(a: Vec3<T>, b: Vec3<T>, radius: T) -> Self {
        Capsule { a, b, radius }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Capsule<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let pa = p - self.a;
        let ba = self.b - self.a;
        let len2 = ba.magnitude2();
        let t = if len2 > T::epsilon() { clamp01(pa.dot(ba) / len2) } else { T::zero() };
        (pa - ba * t).magnitude() - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_matches_the_spec_unit_sphere_scenario() {
        let s = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        assert!((s.value(Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn box_matches_the_spec_diagonal_corner_scenario() {
        let b = Cuboid::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let expected = 2f64.sqrt();
        assert!((b.value(Vec3::new(2.0, 2.0, 0.0)) - expected).abs() < 1e-9);
    }

    #[test]
    fn plane_is_signed_by_normal_side() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(p.value(Vec3::new(0.0, 3.0, 0.0)) > 0.0);
        assert!(p.value(Vec3::new(0.0, -3.0, 0.0)) < 0.0);
    }

    #[test]
    fn cylinder_reduces_to_disk_distance_at_its_equator() {
        let c = Cylinder::new(Vec3::new(0.0, 0.0, 0.0), 1.0, 2.0);
        assert!(c.value(Vec3::new(0.0, 0.0, 0.0)) < 0.0);
        assert!((c.value(Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn capsule_is_a_fattened_segment() {
        let cap = Capsule::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.5);
        assert!(cap.value(Vec3::new(0.0, 0.0, 0.0)) < 0.0);
        assert!((cap.value(Vec3::new(0.0, 0.6, 0.0)) - 0.1).abs() < 1e-9);
    }
}
