//! Transform combinators (spec §4.6's table: Translate, Rotate, Scale,
//! Offset, Annular, Elongate, Blur, Mollify). Each wraps a single child
//! implicit function and remaps the query point (or the returned value)
//! before delegating to it.
use cgmath::prelude::*;
use cgmath::{ BaseFloat, Basis3, Rad };

use crate::space::{ clamp, Vec3 };
use super::ImplicitFunction;

/// `Translate(A, s)`: `v_A(p - s)`.
pub struct Translate<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    offset: Vec3<T>,
}

impl<T: BaseFloat> Translate<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, offset: Vec3<T>) -> Self {
        Translate { child, offset }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Translate<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.child.value(p - self.offset)
    }
}

/// `Rotate(A, theta, axis)`: `v_A(R^-1 p)`. The distilled spec leaves
/// `axis` ambiguous between a coordinate-axis index and an arbitrary
/// vector; this implements the strictly more general arbitrary-axis form
/// (a coordinate axis is just `axis = Vec3::unit(d)`).
pub struct Rotate<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    inverse: Basis3<T>,
}

impl<T: BaseFloat> Rotate<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, axis: Vec3<T>, angle: Rad<T>) -> Self {
        let inverse = Basis3::from_axis_angle(axis.normalize(), -angle);
        Rotate { child, inverse }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Rotate<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.child.value(self.inverse.rotate_vector(p))
    }
}

/// `Scale(A, k)`: `k * v_A(p / k)`.
pub struct Scale<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    factor: T,
}

impl<T: BaseFloat> Scale<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, factor: T) -> Self {
        Scale { child, factor }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Scale<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.factor * self.child.value(p / self.factor)
    }
}

/// `Offset(A, d)`: `v_A(p) - d`.
pub struct Offset<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    amount: T,
}

impl<T: BaseFloat> Offset<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, amount: T) -> Self {
        Offset { child, amount }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Offset<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.child.value(p) - self.amount
    }
}

/// `Annular(A, delta)`: `|v_A(p)| - delta`. Turns a solid into a thin
/// shell of thickness `2*delta` around its original surface.
pub struct Annular<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    delta: T,
}

impl<T: BaseFloat> Annular<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, delta: T) -> Self {
        Annular { child, delta }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Annular<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.child.value(p).abs() - self.delta
    }
}

/// `Elongate(A, h)`: `v_A(p - clamp(p, -h, h))`, stretching the primitive
/// along each axis by `2*h[d]`.
pub struct Elongate<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    half_stretch: Vec3<T>,
}

impl<T: BaseFloat> Elongate<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, half_stretch: Vec3<T>) -> Self {
        Elongate { child, half_stretch }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Elongate<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let h = self.half_stretch;
        let clamped = Vec3::new(clamp(p.x, -h.x, h.x), clamp(p.y, -h.y, h.y), clamp(p.z, -h.z, h.z));
        self.child.value(p - clamped)
    }
}

/// `Blur(A, d, alpha)`: `alpha*v_A(p) + (1-alpha)/2*(v_A(p+d) + v_A(p-d))`.
pub struct Blur<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    offset: Vec3<T>,
    alpha: T,
}

impl<T: BaseFloat> Blur<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, offset: Vec3<T>, alpha: T) -> Self {
        Blur { child, offset, alpha }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Blur<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let center = self.child.value(p);
        let plus = self.child.value(p + self.offset);
        let minus = self.child.value(p - self.offset);
        let half = (T::one() - self.alpha) / T::from(2.0).unwrap();
        self.alpha * center + half * (plus + minus)
    }
}

/// `Mollify(A, kernel, ...)`: `sum_i w_i * v_A(p + s_i)`, with sample
/// offsets and weights precomputed from a kernel (spec §4.6). `weights`
/// must sum to 1 for the result to stay a meaningful value-preserving
/// blur of `A`.
pub struct Mollify<T: BaseFloat> {
    child: Box<dyn ImplicitFunction<T>>,
    samples: Vec<Vec3<T>>,
    weights: Vec<T>,
}

impl<T: BaseFloat> Mollify<T> {
    pub fn new(child: Box<dyn ImplicitFunction<T>>, samples: Vec<Vec3<T>>, weights: Vec<T>) -> Self {
        debug_assert_eq!(samples.len(), weights.len());
        Mollify { child, samples, weights }
    }

    /// A symmetric 6-point stencil (one step along each axis direction)
    /// with Gaussian-derived weights, a common cheap approximation to a
    /// true volumetric mollifier kernel.
    pub fn gaussian_stencil(child: Box<dyn ImplicitFunction<T>>, radius: T) -> Self {
        let directions = [
            Vec3::new(T::one(), T::zero(), T::zero()),
            Vec3::new(-T::one(), T::zero(), T::zero()),
            Vec3::new(T::zero(), T::one(), T::zero()),
            Vec3::new(T::zero(), -T::one(), T::zero()),
            Vec3::new(T::zero(), T::zero(), T::one()),
            Vec3::new(T::zero(), T::zero(), -T::one()),
        ];
        let samples: Vec<Vec3<T>> = directions.iter().map(|&d| d * radius).collect();
        let sigma2 = radius * radius;
        let raw: Vec<T> = samples.iter().map(|s| (-s.magnitude2() / (T::from(2.0).unwrap() * sigma2)).exp()).collect();
        let total = raw.iter().fold(T::zero(), |acc, &w| acc + w);
        let weights: Vec<T> = raw.into_iter().map(|w| w / total).collect();
        Mollify::new(child, samples, weights)
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Mollify<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.samples
            .iter()
            .zip(self.weights.iter())
            .fold(T::zero(), |acc, (&s, &w)| acc + w * self.child.value(p + s))
    }
}
