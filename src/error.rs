//! Diagnostic reporting for bad input (spec §7, "Error Handling Design").
//!
//! The kernel never fails a query: construction routines that hit
//! degenerate input record a [`Diagnostic`] and keep going, the same "log
//! and continue" policy the `bvh` crate's EPSILON-clamped distance code
//! uses for numeric edge cases. Every diagnostic is both pushed onto a
//! [`SanityReport`] the caller can inspect, and emitted through the `log`
//! crate so a caller who doesn't bother collecting the report still sees it
//! on whatever subscriber they've wired up (spec §9's Design Notes: make
//! the sanity report "a structured, returnable value", not printf-only).
use std::fmt;

/// One of the five bad-input conditions the kernel recognises.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A facet with fewer than 3 vertices, or with two coincident vertices.
    InputDegenerate { detail: String },
    /// An unpaired half-edge, a null next/prev link, a face without a
    /// half-edge, or a vertex without an incident face.
    TopologyBroken { detail: String },
    /// Fewer primitives than the branching factor `K` were given to a BVH
    /// partition step.
    EmptyInput { detail: String },
    /// A division by a near-zero length during normal computation; the
    /// length was clamped to `T::epsilon()` instead of propagating a NaN.
    NumericEdge { detail: String },
    /// An unknown BVH build strategy, or mismatched input array lengths.
    ConfigError { detail: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InputDegenerate { detail } => write!(f, "input degenerate: {}", detail),
            Diagnostic::TopologyBroken { detail } => write!(f, "topology broken: {}", detail),
            Diagnostic::EmptyInput { detail } => write!(f, "empty input: {}", detail),
            Diagnostic::NumericEdge { detail } => write!(f, "numeric edge case: {}", detail),
            Diagnostic::ConfigError { detail } => write!(f, "config error: {}", detail),
        }
    }
}

/// An accumulated, inspectable record of every diagnostic raised while
/// building a structure. Construction never aborts on these; clients that
/// need a hard guarantee should check `is_clean()` before querying.
#[derive(Debug, Clone, Default)]
pub struct SanityReport {
    diagnostics: Vec<Diagnostic>,
}

impl SanityReport {
    pub fn new() -> Self {
        SanityReport { diagnostics: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn merge(&mut self, other: SanityReport) {
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean_and_accumulates() {
        let mut report = SanityReport::new();
        assert!(report.is_clean());

        report.push(Diagnostic::InputDegenerate { detail: "facet 3 has 2 vertices".into() });
        assert!(!report.is_clean());
        assert_eq!(report.diagnostics().len(), 1);
    }
}
