//! The closed build-strategy enumeration BVH construction recognises
//! (spec §6, "Build-strategy tag").
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Recursive chunk partition by centroid along the widest axis.
    TopDown,
    /// Bottom-up from Morton codes.
    Morton,
    /// Bottom-up from nested (block-index) codes.
    Nested,
}
