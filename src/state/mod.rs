//! Partial states and attractors exchanged with the engine.
//!
//! Both types are keyed by node names rather than network indices, so they can be
//! compared across networks that differ only in constant folding or variable order.

mod attractor;
mod partial_state;

pub use attractor::TrapSpaceAttractor;
pub use partial_state::{NodeValue, PartialState};

use std::collections::BTreeMap;

/// Attractors of one engine run, keyed by their 0-based index.
pub type Attractors = BTreeMap<usize, TrapSpaceAttractor>;

/// Indices of all attractors that match the given partial state specification.
pub fn matching_attractors(attractors: &Attractors, spec: &PartialState) -> Vec<usize> {
    attractors
        .iter()
        .filter(|(_, attractor)| attractor.matches(spec))
        .map(|(index, _)| *index)
        .collect()
}
