//! Bounding sphere, built with Ritter's two-pass approximate algorithm
//! (spec §3, "Bounding sphere").
use cgmath::prelude::*;
use cgmath::BaseFloat;
use super::{ Vec3, Vec3Ext, min, max };
use super::bounds::Aabb;
use super::bounding_volume::BoundingVolume;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere<T: BaseFloat> {
    pub center: Vec3<T>,
    pub radius: T,
}

impl<T: BaseFloat> BoundingSphere<T> {
    #[inline]
    pub fn empty() -> Self {
        BoundingSphere { center: Vec3::new(T::zero(), T::zero(), T::zero()), radius: -T::one() }
    }

    #[inline]
    pub fn new(center: Vec3<T>, radius: T) -> Self {
        BoundingSphere { center, radius }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.radius < T::zero()
    }

    /// Ritter's two-pass algorithm: find an approximate diameter from an
    /// arbitrary starting point, grow the sphere to enclose every outlier,
    /// then inflate the radius by 1% for numerical safety (spec §3).
    fn ritter(points: &[Vec3<T>]) -> Self {
        if points.is_empty() {
            return BoundingSphere::empty();
        }

        let p0 = points[0];

        // First pass: find the point farthest from an arbitrary point, then
        // the point farthest from that: an approximate diameter endpoint pair.
        let a = farthest_from(points, p0);
        let b = farthest_from(points, a);

        let half = T::one() / (T::one() + T::one());
        let mut center = a + (b - a) * half;
        let mut radius = (b - a).magnitude() * half;

        // Second pass: grow the sphere to enclose any point that falls
        // outside it.
        for &p in points {
            let d = (p - center).magnitude();
            if d > radius {
                let new_radius = (radius + d) * half;
                let k = (new_radius - radius) / d;
                center = center + (p - center) * k;
                radius = new_radius;
            }
        }

        let safety = T::from(1.01).unwrap();
        BoundingSphere { center, radius: radius * safety }
    }

    /// Build a sphere from a union of spheres by reducing to Ritter's
    /// algorithm over the 8 AABB corners of each input sphere (spec §3).
    fn from_sphere_corners(spheres: &[Self]) -> Self {
        let mut corners = Vec::with_capacity(spheres.len() * 8);
        for s in spheres {
            if s.is_empty() { continue; }
            let r = Vec3::new(s.radius, s.radius, s.radius);
            let aabb = Aabb::new(s.center - r, s.center + r);
            for i in 0..8u32 {
                corners.push(Vec3::new(
                    if i & 1 != 0 { aabb.hi.x } else { aabb.lo.x },
                    if i & 2 != 0 { aabb.hi.y } else { aabb.lo.y },
                    if i & 4 != 0 { aabb.hi.z } else { aabb.lo.z },
                ));
            }
        }
        BoundingSphere::ritter(&corners)
    }
}

fn farthest_from<T: BaseFloat>(points: &[Vec3<T>], from: Vec3<T>) -> Vec3<T> {
    let mut best = points[0];
    let mut best_d2 = (best - from).magnitude2();
    for &p in &points[1..] {
        let d2 = (p - from).magnitude2();
        if d2 > best_d2 {
            best_d2 = d2;
            best = p;
        }
    }
    best
}

impl<T: BaseFloat> BoundingVolume<T> for BoundingSphere<T> {
    fn from_points(points: &[Vec3<T>]) -> Self {
        BoundingSphere::ritter(points)
    }

    fn from_volumes(volumes: &[Self]) -> Self {
        BoundingSphere::from_sphere_corners(volumes)
    }

    #[inline]
    fn centroid(&self) -> Vec3<T> {
        self.center
    }

    #[inline]
    fn volume(&self) -> T {
        if self.is_empty() { return T::zero(); }
        let four_thirds_pi = T::from(4.0 / 3.0 * std::f64::consts::PI).unwrap();
        four_thirds_pi * self.radius * self.radius * self.radius
    }

    #[inline]
    fn area(&self) -> T {
        if self.is_empty() { return T::zero(); }
        let four_pi = T::from(4.0 * std::f64::consts::PI).unwrap();
        four_pi * self.radius * self.radius
    }

    #[inline]
    fn intersects(&self, other: &Self) -> bool {
        let r = self.radius + other.radius;
        (self.center - other.center).magnitude2() <= r * r
    }

    fn distance(&self, p: Vec3<T>) -> T {
        max(T::zero(), (p - self.center).magnitude() - self.radius)
    }

    /// Closed-form lens (spherical-cap) volume of the intersection of two
    /// spheres.
    fn overlapping_volume(&self, other: &Self) -> T {
        let d = (self.center - other.center).magnitude();
        let (r1, r2) = (self.radius, other.radius);

        if d >= r1 + r2 { return T::zero(); }
        if d <= (r1 - r2).abs() {
            // One sphere fully contains the other.
            let r = min(r1, r2);
            let four_thirds_pi = T::from(4.0 / 3.0 * std::f64::consts::PI).unwrap();
            return four_thirds_pi * r * r * r;
        }

        let pi = T::from(std::f64::consts::PI).unwrap();
        let two = T::one() + T::one();
        let twelve = T::from(12.0).unwrap();

        // Standard two-sphere lens volume formula.
        let num = pi * (r1 + r2 - d) * (r1 + r2 - d)
            * (d * d + two * d * r2 - T::from(3.0).unwrap() * r2 * r2
                + two * d * r1 + T::from(6.0).unwrap() * r1 * r2 - T::from(3.0).unwrap() * r1 * r1);
        num / (twelve * d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encloses_its_own_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ];
        let s = BoundingSphere::from_points(&pts);
        for &p in &pts {
            assert!(s.distance(p) < 1e-9, "sphere must enclose its generating points");
        }
    }

    #[test]
    fn volume_matches_closed_form() {
        let s = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.0), 2.0);
        let expected = 4.0 / 3.0 * std::f64::consts::PI * 8.0;
        assert!((s.volume() - expected).abs() < 1e-9);
    }

    #[test]
    fn union_of_spheres_contains_both() {
        let a = BoundingSphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let u = BoundingSphere::from_volumes(&[a, b]);
        assert!(u.distance(a.center) < 1e-6);
        assert!(u.distance(b.center) < 1e-6);
        assert!(u.radius >= 3.0); // must span from -3 to 3 at minimum
    }
}
