//! The half-edge mesh arena (spec §3, "DCEL half-edge mesh"; spec §9's
//! Design Notes: "the mesh exclusively owns three vectors ... and entities
//! reference one another by stable index into those arenas, not by
//! pointer"). This breaks the vertex↔edge↔face reference cycle the way
//! `original_source/`'s pointer-owning `Dcel`/`DCEL` types can't in a
//! borrow-checked language.
use cgmath::BaseFloat;

use crate::space::{ Vec2, Vec3 };

/// Stable index into [`Mesh::vertices`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexId(pub(crate) usize);

/// Stable index into [`Mesh::half_edges`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HalfEdgeId(pub(crate) usize);

/// Stable index into [`Mesh::faces`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FaceId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Vertex<T: BaseFloat, M = ()> {
    pub position: Vec3<T>,
    pub outgoing: Option<HalfEdgeId>,
    pub normal: Vec3<T>,
    pub incident_faces: Vec<FaceId>,
    pub meta: Option<M>,
}

#[derive(Debug, Clone)]
pub struct HalfEdge<T: BaseFloat> {
    pub origin: VertexId,
    pub face: Option<FaceId>,
    pub next: Option<HalfEdgeId>,
    pub pair: Option<HalfEdgeId>,
    pub normal: Vec3<T>,
}

/// A face's vertices projected into 2D by dropping the axis of largest
/// normal magnitude (spec §4.5: "discarding the component of its normal
/// with largest magnitude").
#[derive(Debug, Clone)]
pub struct Projection2d<T: BaseFloat> {
    pub dropped_axis: usize,
    pub points: Vec<Vec2<T>>,
}

#[derive(Debug, Clone)]
pub struct Face<T: BaseFloat, M = ()> {
    pub half_edge: Option<HalfEdgeId>,
    pub normal: Vec3<T>,
    pub centroid: Vec3<T>,
    pub area: T,
    pub projection: Option<Projection2d<T>>,
    pub meta: Option<M>,
}

/// The arena: three owned vectors, entities cross-reference by index.
#[derive(Debug, Clone)]
pub struct Mesh<T: BaseFloat, M = ()> {
    pub(crate) vertices: Vec<Vertex<T, M>>,
    pub(crate) half_edges: Vec<HalfEdge<T>>,
    pub(crate) faces: Vec<Face<T, M>>,
}

impl<T: BaseFloat, M> Mesh<T, M> {
    pub(crate) fn empty() -> Self {
        Mesh { vertices: Vec::new(), half_edges: Vec::new(), faces: Vec::new() }
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex<T, M> {
        &self.vertices[id.0]
    }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge<T> {
        &self.half_edges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face<T, M> {
        &self.faces[id.0]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    /// The three (or more, for a polygon) half-edges bounding a face, in
    /// `next` order starting from its stored half-edge.
    pub fn face_half_edges(&self, face: FaceId) -> Vec<HalfEdgeId> {
        let start = match self.faces[face.0].half_edge {
            Some(h) => h,
            None => return Vec::new(),
        };
        let mut out = vec![start];
        let mut cur = self.half_edges[start.0].next;
        while let Some(h) = cur {
            if h == start {
                break;
            }
            out.push(h);
            cur = self.half_edges[h.0].next;
        }
        out
    }
}
