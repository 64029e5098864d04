//! Constructive solid geometry: N-ary union/intersection, binary
//! difference/complement, and their smooth variants (spec §4.6).
use cgmath::BaseFloat;

use crate::space::{ max, min, Vec3 };
use super::ImplicitFunction;

/// `Union(A,B,...)`: `min_i v_i(p)`.
pub struct Union<T: BaseFloat> {
    children: Vec<Box<dyn ImplicitFunction<T>>>,
}

impl<T: BaseFloat> Union<T> {
    pub fn new(children: Vec<Box<dyn ImplicitFunction<T>>>) -> Self {
        Union { children }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Union<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.children.iter().fold(T::infinity(), |acc, c| min(acc, c.value(p)))
    }
}

/// `Intersection(A,B,...)`: `max_i v_i(p)`.
pub struct Intersection<T: BaseFloat> {
    children: Vec<Box<dyn ImplicitFunction<T>>>,
}

impl<T: BaseFloat> Intersection<T> {
    pub fn new(children: Vec<Box<dyn ImplicitFunction<T>>>) -> Self {
        Intersection { children }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Intersection<T> {
    fn value(&self, p: Vec3<T>) -> T {
        self.children.iter().fold(-T::infinity(), |acc, c| max(acc, c.value(p)))
    }
}

/// `Difference(A, B)`: `max(v_A(p), -v_B(p))`.
pub struct Difference<T: BaseFloat> {
    a: Box<dyn ImplicitFunction<T>>,
    b: Box<dyn ImplicitFunction<T>>,
}

impl<T: BaseFloat> Difference<T> {
    pub fn new(a: Box<dyn ImplicitFunction<T>>, b: Box<dyn ImplicitFunction<T>>) -> Self {
        Difference { a, b }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Difference<T> {
    fn value(&self, p: Vec3<T>) -> T {
        max(self.a.value(p), -self.b.value(p))
    }
}

/// `Complement(A)`: `-v_A(p)`.
pub struct Complement<T: BaseFloat> {
    a: Box<dyn ImplicitFunction<T>>,
}

impl<T: BaseFloat> Complement<T> {
    pub fn new(a: Box<dyn ImplicitFunction<T>>) -> Self {
        Complement { a }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for Complement<T> {
    fn value(&self, p: Vec3<T>) -> T {
        -self.a.value(p)
    }
}

/// Which smoothing formula a smooth combinator uses (spec §4.6, "Smooth
/// min/max"). `Polynomial` is the default; `Exponential` is the variant
/// the original carries alongside it (`expMin`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SmoothKind {
    Polynomial,
    Exponential,
}

impl Default for SmoothKind {
    fn default() -> Self {
        SmoothKind::Polynomial
    }
}

/// Smoothing length is clamped to at least the smallest positive
/// representable value, so the formulas below never divide by zero (spec
/// §4.6: "Smoothing length s is clamped to at least the floating-point
/// minimum positive value").
fn clamp_smoothing_length<T: BaseFloat>(s: T) -> T {
    max(s, T::min_positive_value())
}

pub fn smooth_min<T: BaseFloat>(a: T, b: T, s: T, kind: SmoothKind) -> T {
    let s = clamp_smoothing_length(s);
    match kind {
        SmoothKind::Polynomial => {
            let four = T::from(4.0).unwrap();
            let h = max(s - (a - b).abs(), T::zero()) / s;
            min(a, b) - (h * h * s) / four
        }
        SmoothKind::Exponential => {
            let ea = (-a / s).exp();
            let eb = (-b / s).exp();
            -s * (ea + eb).ln()
        }
    }
}

pub fn smooth_max<T: BaseFloat>(a: T, b: T, s: T, kind: SmoothKind) -> T {
    let s = clamp_smoothing_length(s);
    match kind {
        SmoothKind::Polynomial => {
            let four = T::from(4.0).unwrap();
            let h = max(s - (a - b).abs(), T::zero()) / s;
            max(a, b) + (h * h * s) / four
        }
        // max(a,b) = -min(-a,-b); reuses the exponential smooth-min formula
        // directly rather than re-deriving a dual polynomial one.
        SmoothKind::Exponential => -smooth_min(-a, -b, s, kind),
    }
}

/// `SmoothUnion(A,B,s)`, generalised to N primitives (spec §4.6, "Smooth
/// union over N primitives"): evaluate every child, keep the two smallest
/// values `a <= b`, return `smoothMin(a, b, s)`. The smoothing zone is
/// localised to the nearest pair.
pub struct SmoothUnion<T: BaseFloat> {
    children: Vec<Box<dyn ImplicitFunction<T>>>,
    smoothing: T,
    kind: SmoothKind,
}

impl<T: BaseFloat> SmoothUnion<T> {
    pub fn new(children: Vec<Box<dyn ImplicitFunction<T>>>, smoothing: T, kind: SmoothKind) -> Self {
        SmoothUnion { children, smoothing, kind }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for SmoothUnion<T> {
    fn value(&self, p: Vec3<T>) -> T {
        let (mut a, mut b) = (T::infinity(), T::infinity());
        for c in &self.children {
            let v = c.value(p);
            if v < a {
                b = a;
                a = v;
            } else if v < b {
                b = v;
            }
        }
        smooth_min(a, b, self.smoothing, self.kind)
    }
}

/// `SmoothIntersection(A,B,s)`: `smoothMax(v_A, v_B, s)`.
pub struct SmoothIntersection<T: BaseFloat> {
    a: Box<dyn ImplicitFunction<T>>,
    b: Box<dyn ImplicitFunction<T>>,
    smoothing: T,
    kind: SmoothKind,
}

impl<T: BaseFloat> SmoothIntersection<T> {
    pub fn new(a: Box<dyn ImplicitFunction<T>>, b: Box<dyn ImplicitFunction<T>>, smoothing: T, kind: SmoothKind) -> Self {
        SmoothIntersection { a, b, smoothing, kind }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for SmoothIntersection<T> {
    fn value(&self, p: Vec3<T>) -> T {
        smooth_max(self.a.value(p), self.b.value(p), self.smoothing, self.kind)
    }
}

/// `SmoothDifference(A,B,s)`: `smoothMax(v_A, -v_B, s)`.
pub struct SmoothDifference<T: BaseFloat> {
    a: Box<dyn ImplicitFunction<T>>,
    b: Box<dyn ImplicitFunction<T>>,
    smoothing: T,
    kind: SmoothKind,
}

impl<T: BaseFloat> SmoothDifference<T> {
    pub fn new(a: Box<dyn ImplicitFunction<T>>, b: Box<dyn ImplicitFunction<T>>, smoothing: T, kind: SmoothKind) -> Self {
        SmoothDifference { a, b, smoothing, kind }
    }
}

impl<T: BaseFloat> ImplicitFunction<T> for SmoothDifference<T> {
    fn value(&self, p: Vec3<T>) -> T {
        smooth_max(self.a.value(p), -self.b.value(p), self.smoothing, self.kind)
    }
}
