//! Soup-to-DCEL construction (spec §4.4): degeneracy check, vertex
//! compression, half-edge wiring, pair-edge reconciliation, and normals.
use std::cmp::Ordering;

use cgmath::prelude::*;
use cgmath::BaseFloat;

use crate::error::{ Diagnostic, SanityReport };
use crate::soup::Soup;
use crate::space::{ Vec2, Vec3, Vec3Ext };
use super::mesh::{ Face, HalfEdge, HalfEdgeId, Mesh, Projection2d, Vertex, VertexId };

/// Build a half-edge mesh from a soup. Degenerate facets are dropped (with
/// a diagnostic); every other step records diagnostics but never aborts.
pub fn build<T: BaseFloat, M: Clone>(soup: &Soup<T>, report: &mut SanityReport) -> Mesh<T, M> {
    let degenerate = soup.degenerate_facets(report);
    let (positions, index_map) = compress_vertices(&soup.vertices);

    let mut mesh: Mesh<T, M> = Mesh::empty();
    mesh.vertices = positions
        .into_iter()
        .map(|position| Vertex {
            position,
            outgoing: None,
            normal: zero3(),
            incident_faces: Vec::new(),
            meta: None,
        })
        .collect();

    for (fi, facet) in soup.facets.iter().enumerate() {
        if degenerate[fi] {
            continue;
        }
        wire_facet(&mut mesh, facet, &index_map);
    }

    pair_edges(&mut mesh, report);
    compute_face_normals(&mut mesh, report);
    compute_edge_normals(&mut mesh);
    compute_vertex_normals(&mut mesh, report);
    compute_projections(&mut mesh);
    check_topology(&mesh, report);

    mesh
}

/// Lexicographic sort-and-scan vertex deduplication (spec §4.4,
/// "Compression"). Returns the deduplicated position list and a map from
/// original index to new index.
fn compress_vertices<T: BaseFloat>(vertices: &[Vec3<T>]) -> (Vec<Vec3<T>>, Vec<usize>) {
    let mut indexed: Vec<(usize, Vec3<T>)> = vertices.iter().copied().enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| cmp_vec3(a, b));

    let mut positions = Vec::new();
    let mut map = vec![0usize; vertices.len()];
    for (original_index, position) in indexed {
        if positions.last().map_or(true, |&last: &Vec3<T>| last != position) {
            positions.push(position);
        }
        map[original_index] = positions.len() - 1;
    }
    (positions, map)
}

fn cmp_vec3<T: BaseFloat>(a: &Vec3<T>, b: &Vec3<T>) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
        .then_with(|| a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal))
}

fn zero3<T: BaseFloat>() -> Vec3<T> {
    Vec3::new(T::zero(), T::zero(), T::zero())
}

/// Steps 1-5 of "Half-edge wiring": allocate one half-edge per corner, wire
/// `next` cyclically, allocate the face, register incidence.
fn wire_facet<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>, facet: &[usize], index_map: &[usize]) {
    let verts: Vec<VertexId> = facet.iter().map(|&i| VertexId(index_map[i])).collect();
    let n = verts.len();
    let first = mesh.half_edges.len();

    for &v in &verts {
        mesh.half_edges.push(HalfEdge { origin: v, face: None, next: None, pair: None, normal: zero3() });
    }
    for k in 0..n {
        let cur = HalfEdgeId(first + k);
        let nxt = HalfEdgeId(first + (k + 1) % n);
        mesh.half_edges[cur.0].next = Some(nxt);
    }

    let face_id = super::mesh::FaceId(mesh.faces.len());
    mesh.faces.push(Face {
        half_edge: Some(HalfEdgeId(first)),
        normal: zero3(),
        centroid: zero3(),
        area: T::zero(),
        projection: None,
        meta: None,
    });

    for (k, &v) in verts.iter().enumerate() {
        let he = HalfEdgeId(first + k);
        mesh.half_edges[he.0].face = Some(face_id);
        let vertex = &mut mesh.vertices[v.0];
        if !vertex.incident_faces.contains(&face_id) {
            vertex.incident_faces.push(face_id);
        }
        if vertex.outgoing.is_none() {
            vertex.outgoing = Some(he);
        }
    }
}

/// "For every half-edge e from u to v, search the incident faces of u for
/// a half-edge from v to u; set each as the other's pair."
fn pair_edges<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>, report: &mut SanityReport) {
    let n = mesh.half_edges.len();
    for i in 0..n {
        if mesh.half_edges[i].pair.is_some() {
            continue;
        }
        let u = mesh.half_edges[i].origin;
        let next = match mesh.half_edges[i].next {
            Some(next) => next,
            None => continue,
        };
        let v = mesh.half_edges[next.0].origin;

        let mut found = None;
        'search: for face in mesh.vertices[u.0].incident_faces.clone() {
            for he in mesh.face_half_edges(face) {
                if he.0 == i {
                    continue;
                }
                let he_next = match mesh.half_edges[he.0].next {
                    Some(next) => next,
                    None => continue,
                };
                let origin = mesh.half_edges[he.0].origin;
                let dest = mesh.half_edges[he_next.0].origin;
                if origin == v && dest == u {
                    found = Some(he);
                    break 'search;
                }
            }
        }

        if let Some(pair) = found {
            mesh.half_edges[i].pair = Some(pair);
            mesh.half_edges[pair.0].pair = Some(HalfEdgeId(i));
        }
    }

    let unpaired = mesh.half_edges.iter().filter(|e| e.pair.is_none()).count();
    if unpaired > 0 {
        report.push(Diagnostic::TopologyBroken {
            detail: format!("{} half-edge(s) have no pair; mesh is not watertight", unpaired),
        });
    }
}

/// Face normal: the first consecutive vertex triple whose cross product is
/// non-degenerate, normalised. Also fills in centroid and area.
fn compute_face_normals<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>, report: &mut SanityReport) {
    let epsilon = T::epsilon() * T::from(16.0).unwrap();
    for face_id in mesh.face_ids() {
        let hes = mesh.face_half_edges(face_id);
        let positions: Vec<Vec3<T>> = hes.iter().map(|&h| mesh.vertices[mesh.half_edges[h.0].origin.0].position).collect();
        let n = positions.len();
        if n < 3 {
            continue;
        }

        let mut normal = zero3();
        let mut found = false;
        for i in 0..n {
            let a = positions[i];
            let b = positions[(i + 1) % n];
            let c = positions[(i + 2) % n];
            let cross = (b - a).cross(c - a);
            if cross.magnitude() > epsilon {
                normal = cross.normalize();
                found = true;
                break;
            }
        }
        if !found {
            report.push(Diagnostic::NumericEdge {
                detail: format!("face {} has no non-degenerate vertex triple; normal undefined", face_id_index(face_id)),
            });
        }

        let centroid = positions.iter().fold(zero3(), |acc, &p| acc + p) / T::from(n as f64).unwrap();

        // Newell's method: area vector is half the sum of consecutive cross
        // products; its magnitude is the polygon area regardless of normal
        // orientation convention.
        let mut area_vec = zero3();
        for i in 0..n {
            area_vec = area_vec + positions[i].cross(positions[(i + 1) % n]);
        }
        let area = area_vec.magnitude() * T::from(0.5).unwrap();

        let face = &mut mesh.faces[face_id.0];
        face.normal = normal;
        face.centroid = centroid;
        face.area = area;
    }
}

fn face_id_index(face: super::mesh::FaceId) -> usize {
    face.0
}

/// Edge normal: average of the two incident face normals, normalised. A
/// boundary (unpaired) half-edge falls back to its own face's normal.
fn compute_edge_normals<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>) {
    let n = mesh.half_edges.len();
    for i in 0..n {
        let own_face = mesh.half_edges[i].face;
        let own_normal = own_face.map(|f| mesh.faces[f.0].normal).unwrap_or_else(zero3);

        let normal = match mesh.half_edges[i].pair {
            Some(pair) => {
                let pair_face = mesh.half_edges[pair.0].face;
                let pair_normal = pair_face.map(|f| mesh.faces[f.0].normal).unwrap_or(own_normal);
                let sum = own_normal + pair_normal;
                if sum.magnitude2() > T::epsilon() {
                    sum.normalize()
                } else {
                    own_normal
                }
            }
            None => own_normal,
        };
        mesh.half_edges[i].normal = normal;
    }
}

/// Vertex normal: the angle-weighted pseudonormal, `sum(alpha_i * n_i)`
/// over incident faces, normalised (spec §4.4, "Normals").
fn compute_vertex_normals<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>, report: &mut SanityReport) {
    for vi in 0..mesh.vertices.len() {
        let vertex_id = VertexId(vi);
        let incident = mesh.vertices[vi].incident_faces.clone();
        let mut accum = zero3();
        for face in incident {
            let alpha = subtended_angle_at_vertex(mesh, face, vertex_id);
            accum = accum + mesh.faces[face.0].normal * alpha;
        }

        let len = accum.magnitude();
        let normal = if len > T::epsilon() {
            accum / len
        } else {
            report.push(Diagnostic::NumericEdge {
                detail: format!("vertex {} has degenerate pseudonormal; defaulting to zero", vi),
            });
            zero3()
        };
        mesh.vertices[vi].normal = normal;
    }
}

/// The angle between the two edges of `face` meeting at `vertex`.
fn subtended_angle_at_vertex<T: BaseFloat, M: Clone>(mesh: &Mesh<T, M>, face: super::mesh::FaceId, vertex: VertexId) -> T {
    let hes = mesh.face_half_edges(face);
    let n = hes.len();
    let idx = match hes.iter().position(|&h| mesh.half_edges[h.0].origin == vertex) {
        Some(idx) => idx,
        None => return T::zero(),
    };

    let cur = hes[idx];
    let prev = hes[(idx + n - 1) % n];
    let here = mesh.vertices[vertex.0].position;
    let next_vertex = mesh.half_edges[mesh.half_edges[cur.0].next.unwrap().0].origin;
    let prev_vertex = mesh.half_edges[prev.0].origin;

    let to_next = mesh.vertices[next_vertex.0].position - here;
    let to_prev = mesh.vertices[prev_vertex.0].position - here;

    let (ln, lp) = (to_next.magnitude(), to_prev.magnitude());
    if ln <= T::epsilon() || lp <= T::epsilon() {
        return T::zero();
    }
    let cos = clamp_unit((to_next / ln).dot(to_prev / lp));
    cos.acos()
}

fn clamp_unit<T: BaseFloat>(v: T) -> T {
    if v > T::one() { T::one() } else if v < -T::one() { -T::one() } else { v }
}

/// The 2D projection used for point-in-face tests (spec §4.5): drop the
/// coordinate axis of largest normal magnitude.
fn compute_projections<T: BaseFloat, M: Clone>(mesh: &mut Mesh<T, M>) {
    for face_id in mesh.face_ids() {
        let normal = mesh.faces[face_id.0].normal;
        let dropped_axis = normal.abs().max_dir();
        let hes = mesh.face_half_edges(face_id);
        let points: Vec<Vec2<T>> = hes
            .iter()
            .map(|&h| drop_axis(mesh.vertices[mesh.half_edges[h.0].origin.0].position, dropped_axis))
            .collect();
        mesh.faces[face_id.0].projection = Some(Projection2d { dropped_axis, points });
    }
}

pub(crate) fn drop_axis<T: BaseFloat>(p: Vec3<T>, axis: usize) -> Vec2<T> {
    match axis {
        0 => Vec2::new(p.y, p.z),
        1 => Vec2::new(p.x, p.z),
        _ => Vec2::new(p.x, p.y),
    }
}

/// Sanity pass (spec §3, "Invariants"): checks every half-edge's
/// `next`/`pair` cycle and every vertex's incidence, reporting but never
/// aborting.
fn check_topology<T: BaseFloat, M: Clone>(mesh: &Mesh<T, M>, report: &mut SanityReport) {
    for (i, he) in mesh.half_edges.iter().enumerate() {
        if he.face.is_none() {
            report.push(Diagnostic::TopologyBroken { detail: format!("half-edge {} has no face", i) });
        }
        if let Some(pair) = he.pair {
            if mesh.half_edges[pair.0].pair != Some(HalfEdgeId(i)) {
                report.push(Diagnostic::TopologyBroken { detail: format!("half-edge {} pair is not reciprocal", i) });
            }
        }
    }
    for (i, v) in mesh.vertices.iter().enumerate() {
        if v.incident_faces.is_empty() {
            report.push(Diagnostic::TopologyBroken { detail: format!("vertex {} has no incident face", i) });
        }
        if let Some(out) = v.outgoing {
            if mesh.half_edges[out.0].origin != VertexId(i) {
                report.push(Diagnostic::TopologyBroken { detail: format!("vertex {} outgoing edge has wrong origin", i) });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Soup<f64> {
        let v = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        // Outward-facing winding for a tetrahedron with this vertex order.
        let facets = vec![
            vec![0, 2, 1],
            vec![0, 1, 3],
            vec![0, 3, 2],
            vec![1, 2, 3],
        ];
        Soup::new(v, facets)
    }

    #[test]
    fn tetrahedron_builds_a_watertight_mesh() {
        let soup = tetrahedron();
        let mut report = SanityReport::new();
        let mesh: Mesh<f64, ()> = build(&soup, &mut report);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.half_edge_count(), 12);
        assert!(mesh.half_edges.iter().all(|e| e.pair.is_some()));
        assert!(report.diagnostics().iter().all(|d| !matches!(d, Diagnostic::TopologyBroken { .. })));
    }

    #[test]
    fn compression_dedupes_coincident_positions() {
        let soup = Soup::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0), // duplicate of vertex 0
            ],
            vec![vec![0, 1, 2], vec![3, 1, 2]],
        );
        let mut report = SanityReport::new();
        let mesh: Mesh<f64, ()> = build(&soup, &mut report);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn degenerate_facet_is_skipped_not_aborted() {
        let soup = Soup::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![vec![0, 1], vec![0, 1, 2]],
        );
        let mut report = SanityReport::new();
        let mesh: Mesh<f64, ()> = build(&soup, &mut report);
        assert_eq!(mesh.face_count(), 1);
        assert!(!report.is_clean());
    }
}
