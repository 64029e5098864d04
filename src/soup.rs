//! Vertex/facet soup: the only wire format the kernel defines (spec §6,
//! "Input soup format"). A raw list of positions and facet index lists with
//! no enforced topology, the shape a parsed STL/PLY/VTK file would arrive
//! in before `dcel::build` turns it into a half-edge mesh.
use cgmath::BaseFloat;

use crate::error::{ Diagnostic, SanityReport };
use crate::space::Vec3;

/// A facet is a list of `>= 3` indices into a soup's `vertices`.
pub type Facet = Vec<usize>;

/// A raw, topology-free mesh: positions plus facet index lists. Winding
/// order encodes orientation by the right-hand rule.
#[derive(Debug, Clone)]
pub struct Soup<T: BaseFloat> {
    pub vertices: Vec<Vec3<T>>,
    pub facets: Vec<Facet>,
}

impl<T: BaseFloat> Soup<T> {
    pub fn new(vertices: Vec<Vec3<T>>, facets: Vec<Facet>) -> Self {
        Soup { vertices, facets }
    }

    /// A facet is degenerate if it has fewer than 3 vertices, any index is
    /// out of range, or any two of its vertices coincide (spec §4.4,
    /// "Degeneracy check"). Degenerate facets are reported but not removed
    /// here; `dcel::build` skips them while wiring and keeps going.
    pub fn degenerate_facets(&self, report: &mut SanityReport) -> Vec<bool> {
        self.facets
            .iter()
            .enumerate()
            .map(|(i, facet)| {
                let degenerate = self.facet_is_degenerate(facet);
                if degenerate {
                    report.push(Diagnostic::InputDegenerate {
                        detail: format!("facet {} has {} vertices or coincident positions", i, facet.len()),
                    });
                }
                degenerate
            })
            .collect()
    }

    fn facet_is_degenerate(&self, facet: &Facet) -> bool {
        if facet.len() < 3 {
            return true;
        }
        if facet.iter().any(|&i| i >= self.vertices.len()) {
            return true;
        }
        for i in 0..facet.len() {
            for j in (i + 1)..facet.len() {
                if self.vertices[facet[i]] == self.vertices[facet[j]] {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_short_and_coincident_facets() {
        let soup = Soup::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![
                vec![0, 1],          // too few vertices
                vec![0, 1, 1],       // coincident pair
                vec![0, 1, 2],       // fine
            ],
        );
        let mut report = SanityReport::new();
        let flags = soup.degenerate_facets(&mut report);
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(report.diagnostics().len(), 2);
    }
}
