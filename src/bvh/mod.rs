//! Bounding-volume hierarchy: a pointer-based build tree (spec §4.2), a
//! flattened traversal-friendly array representation (spec §4.3), and the
//! build-strategy tag that selects between them (spec §6).
pub mod build;
pub mod flat;
pub mod strategy;

pub use build::BuildNode;
pub use flat::{ LinearBvh, LinearNode };
pub use strategy::BuildStrategy;
