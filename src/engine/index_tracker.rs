use crate::state::Attractors;
use log::trace;

/// The outcome of [`AttractorIndexTracker::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexCheck {
    Stable,
    /// Known indices which are missing from the fresh listing or map to a different
    /// attractor.
    Unstable { mismatched: Vec<usize> },
}

impl IndexCheck {
    pub fn is_stable(&self) -> bool {
        matches!(self, IndexCheck::Stable)
    }
}

/// Verifies that the engine kept its attractor numbering between two runs.
///
/// The engine numbers attractors in the order in which it finds them, and this order
/// may change with the query arguments. Control results refer to attractors by index,
/// so they are only meaningful together with the listing of the same run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttractorIndexTracker {
    enabled: bool,
}

impl AttractorIndexTracker {
    pub fn new(enabled: bool) -> AttractorIndexTracker {
        AttractorIndexTracker { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compare every `known` attractor with the one under the same index in `fresh`.
    /// A disabled tracker always reports [`IndexCheck::Stable`].
    pub fn check(&self, known: &Attractors, fresh: &Attractors) -> IndexCheck {
        if !self.enabled {
            return IndexCheck::Stable;
        }
        let mismatched = known
            .iter()
            .filter(|(index, attractor)| fresh.get(*index) != Some(*attractor))
            .map(|(index, _)| *index)
            .collect::<Vec<_>>();
        trace!(
            "Checked {} known attractor index(es), {} mismatched.",
            known.len(),
            mismatched.len()
        );
        if mismatched.is_empty() {
            IndexCheck::Stable
        } else {
            IndexCheck::Unstable { mismatched }
        }
    }
}
