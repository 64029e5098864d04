//! Flattened, cache-friendly BVH traversal representation (spec §4.3).
//!
//! A build node holds a variable-length primitive list and can span several
//! cache lines; `LinearBvh` walks the build tree once in depth-first order
//! and emits one fixed-size [`LinearNode`] record per node, the same
//! flatten-to-array trick `lasgun::accelerators::bvh::BVHAccel` uses
//! (`flatten_bvh_tree` / `LinearBVHNode`), generalised from its
//! binary-only layout to an arbitrary branching factor `K`.
use std::array;
use std::marker::PhantomData;

use cgmath::BaseFloat;

use crate::space::BoundingVolume;
use super::build::{ BuildNode, Content };

/// One record in the flattened array: `{bv, primitivesOffset, numPrimitives,
/// childOffsets[K]}` (spec §3, "BVH linear-node (flat)"). Whether a record
/// is a leaf is carried by `leaf` itself, not inferred from `num_primitives`:
/// a leaf built from zero primitives (an empty `FastUnionIF`, or a mesh whose
/// facets were all degenerate) still has `num_primitives == 0`, and without
/// an explicit discriminator it would be mistaken for an interior node whose
/// never-overwritten `child_offsets` all point back at the root.
#[derive(Clone, Copy)]
pub struct LinearNode<T: BaseFloat, BV: BoundingVolume<T>, const K: usize> {
    pub bv: BV,
    pub primitives_offset: u32,
    pub num_primitives: u32,
    pub child_offsets: [u32; K],
    pub leaf: bool,
    _scalar: PhantomData<T>,
}

impl<T: BaseFloat, BV: BoundingVolume<T>, const K: usize> LinearNode<T, BV, K> {
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }
}

/// The flattened BVH: an array of [`LinearNode`] records plus the flat
/// array of primitives, reordered into leaf-visit order.
pub struct LinearBvh<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> {
    nodes: Vec<LinearNode<T, BV, K>>,
    primitives: Vec<(P, BV)>,
}

impl<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize> LinearBvh<T, P, BV, K> {
    /// Flatten a build tree. Per spec §9's Open Questions, a build tree on
    /// which no partition ever occurred (the root itself was never split)
    /// is simply a single-leaf build node already: `flatten` treats it as
    /// one leaf record, which this walk does naturally since a build node
    /// that is a `Content::Leaf` is always emitted as exactly that.
    pub fn build(root: BuildNode<T, P, BV, K>) -> Self {
        let mut nodes = Vec::new();
        let mut primitives = Vec::new();
        flatten_node(root, &mut nodes, &mut primitives);
        LinearBvh { nodes, primitives }
    }

    pub fn root_bounds(&self) -> BV {
        self.nodes[0].bv
    }

    pub fn primitives(&self) -> &[(P, BV)] {
        &self.primitives
    }

    pub fn nodes(&self) -> &[LinearNode<T, BV, K>] {
        &self.nodes
    }

    /// The same higher-order traversal contract as
    /// [`BuildNode::traverse`] (spec §4.3: "The resulting `LinearBVH`
    /// exposes the same `traverse` contract as the build tree").
    pub fn traverse<M>(
        &self,
        meta_updater: &mut impl FnMut(&LinearNode<T, BV, K>) -> M,
        visiter: &mut impl FnMut(&LinearNode<T, BV, K>, &M) -> bool,
        sorter: &mut impl FnMut(&mut Vec<(usize, M)>),
        updater: &mut impl FnMut(&[(P, BV)]),
    ) {
        if self.nodes.is_empty() {
            return;
        }

        let root_meta = meta_updater(&self.nodes[0]);
        if !visiter(&self.nodes[0], &root_meta) {
            return;
        }

        let mut stack: Vec<(usize, M)> = vec![(0, root_meta)];
        while let Some((i, _meta)) = stack.pop() {
            let node = &self.nodes[i];
            if node.is_leaf() {
                let start = node.primitives_offset as usize;
                let end = start + node.num_primitives as usize;
                updater(&self.primitives[start..end]);
            } else {
                let mut entries: Vec<(usize, M)> = node
                    .child_offsets
                    .iter()
                    .map(|&off| {
                        let child = &self.nodes[off as usize];
                        (off as usize, meta_updater(child))
                    })
                    .filter(|(off, m)| visiter(&self.nodes[*off], m))
                    .collect();
                sorter(&mut entries);
                stack.extend(entries);
            }
        }
    }
}

fn flatten_node<T: BaseFloat, P, BV: BoundingVolume<T>, const K: usize>(
    node: BuildNode<T, P, BV, K>,
    nodes: &mut Vec<LinearNode<T, BV, K>>,
    primitives: &mut Vec<(P, BV)>,
) -> usize {
    let my_index = nodes.len();
    nodes.push(LinearNode {
        bv: node.bv,
        primitives_offset: 0,
        num_primitives: 0,
        child_offsets: [0; K],
        leaf: false,
        _scalar: PhantomData,
    });

    match node.content {
        Content::Leaf(items) => {
            let offset = primitives.len() as u32;
            let count = items.len() as u32;
            primitives.extend(items);
            nodes[my_index].primitives_offset = offset;
            nodes[my_index].num_primitives = count;
            nodes[my_index].leaf = true;
        }
        Content::Interior(children) => {
            let mut offsets: [u32; K] = array::from_fn(|_| 0);
            for (i, child) in children.into_iter().enumerate() {
                offsets[i] = flatten_node(*child, nodes, primitives) as u32;
            }
            nodes[my_index].child_offsets = offsets;
        }
    }

    my_index
}
