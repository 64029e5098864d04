//! Point-in-polygon tests over a face's 2D projection (spec §4.5, step 2):
//! crossing number (default), winding number, and subtended angle, all
//! operating on the same flattened `Vec2` ring.
use cgmath::BaseFloat;

use crate::space::Vec2;

/// Which inside-outside test a face (or the whole mesh) uses. Selectable
/// per-face in principle; the kernel applies one choice mesh-wide (spec
/// §9's Open Questions: "a reasonable design choice either way").
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsideTest {
    CrossingNumber,
    Winding,
    SubtendedAngle,
}

impl Default for InsideTest {
    fn default() -> Self {
        InsideTest::CrossingNumber
    }
}

pub fn point_in_polygon<T: BaseFloat>(points: &[Vec2<T>], p: Vec2<T>, test: InsideTest) -> bool {
    match test {
        InsideTest::CrossingNumber => crossing_number(points, p),
        InsideTest::Winding => winding_number(points, p) != 0,
        InsideTest::SubtendedAngle => subtended_angle(points, p),
    }
}

/// Count rightward-ray crossings; inside iff odd. The half-open rule
/// `(y1 <= y < y2)` on whichever endpoint is lower avoids double-counting
/// a ray that passes exactly through a vertex.
fn crossing_number<T: BaseFloat>(points: &[Vec2<T>], p: Vec2<T>) -> bool {
    let n = points.len();
    let mut crossings = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let straddles = (a.y <= p.y && p.y < b.y) || (b.y <= p.y && p.y < a.y);
        if straddles {
            let t = (p.y - a.y) / (b.y - a.y);
            let x_cross = a.x + t * (b.x - a.x);
            if x_cross > p.x {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

fn is_left<T: BaseFloat>(a: Vec2<T>, b: Vec2<T>, p: Vec2<T>) -> T {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Sum signed edge crossings using the left-of test; inside iff nonzero.
fn winding_number<T: BaseFloat>(points: &[Vec2<T>], p: Vec2<T>) -> i32 {
    let n = points.len();
    let mut wn = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > T::zero() {
                wn += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < T::zero() {
            wn -= 1;
        }
    }
    wn
}

/// Sum signed angles subtended by each edge as seen from `p`; inside iff
/// the absolute total rounds to `2*pi`.
fn subtended_angle<T: BaseFloat>(points: &[Vec2<T>], p: Vec2<T>) -> bool {
    let n = points.len();
    let mut total = T::zero();
    for i in 0..n {
        let a = points[i] - p;
        let b = points[(i + 1) % n] - p;
        let cross = a.x * b.y - a.y * b.x;
        let dot = a.x * b.x + a.y * b.y;
        total = total + cross.atan2(dot);
    }
    let two_pi = T::from(2.0 * std::f64::consts::PI).unwrap();
    let tolerance = T::from(1e-6).unwrap();
    (total.abs() - two_pi).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2<f64>> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn crossing_number_agrees_on_centre_and_outside() {
        let sq = unit_square();
        assert!(point_in_polygon(&sq, Vec2::new(0.5, 0.5), InsideTest::CrossingNumber));
        assert!(!point_in_polygon(&sq, Vec2::new(2.0, 0.5), InsideTest::CrossingNumber));
    }

    #[test]
    fn winding_number_agrees_with_crossing_number() {
        let sq = unit_square();
        for &(x, y) in &[(0.5, 0.5), (2.0, 0.5), (-0.5, 0.5), (0.5, 2.0)] {
            let p = Vec2::new(x, y);
            assert_eq!(
                point_in_polygon(&sq, p, InsideTest::CrossingNumber),
                point_in_polygon(&sq, p, InsideTest::Winding)
            );
        }
    }

    #[test]
    fn subtended_angle_agrees_on_centre_and_outside() {
        let sq = unit_square();
        assert!(point_in_polygon(&sq, Vec2::new(0.5, 0.5), InsideTest::SubtendedAngle));
        assert!(!point_in_polygon(&sq, Vec2::new(5.0, 5.0), InsideTest::SubtendedAngle));
    }
}
