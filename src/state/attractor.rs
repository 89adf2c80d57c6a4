use crate::state::{NodeValue, PartialState};
use std::fmt::{Display, Formatter};

/// An attractor reported by the engine, described by one or more [`PartialState`]s.
///
/// A steady state is a single complete state. A cyclic attractor is a list of partial
/// states whose union covers every state visited by the attractor. The list is never
/// empty and keeps the order in which the engine printed the states.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapSpaceAttractor {
    states: Vec<PartialState>,
}

impl From<PartialState> for TrapSpaceAttractor {
    fn from(value: PartialState) -> Self {
        TrapSpaceAttractor {
            states: vec![value],
        }
    }
}

impl TrapSpaceAttractor {
    /// Build an attractor from a list of states; returns `None` if the list is empty.
    pub fn from_states(states: Vec<PartialState>) -> Option<TrapSpaceAttractor> {
        if states.is_empty() {
            None
        } else {
            Some(TrapSpaceAttractor { states })
        }
    }

    /// Merge the states of `other` into this attractor (appended after the current ones).
    pub fn extend(mut self, other: TrapSpaceAttractor) -> TrapSpaceAttractor {
        self.states.extend(other.states);
        self
    }

    pub fn states(&self) -> &[PartialState] {
        &self.states
    }

    /// True if the attractor is a single state without wildcards.
    pub fn is_steady_state(&self) -> bool {
        self.states.len() == 1 && self.states[0].iter().all(|(_, v)| v.is_fixed())
    }

    /// Number of concrete states covered by the partial states (each wildcard doubles
    /// the count of its partial state).
    pub fn covered_states(&self) -> usize {
        self.states
            .iter()
            .map(|state| {
                let wildcards = state.iter().filter(|(_, v)| !v.is_fixed()).count();
                1usize.checked_shl(wildcards as u32).unwrap_or(usize::MAX)
            })
            .fold(0usize, |acc, it| acc.saturating_add(it))
    }

    /// True if at least one state of this attractor satisfies every fixed value of `spec`.
    pub fn matches(&self, spec: &PartialState) -> bool {
        self.states.iter().any(|state| state.agrees_with(spec))
    }

    /// The value of `node` shared by all states of the attractor, or [`NodeValue::Any`]
    /// when the states disagree (or do not mention the node).
    pub fn projection(&self, node: &str) -> NodeValue {
        let mut values = self.states.iter().map(|it| it.get(node));
        let Some(Some(first)) = values.next() else {
            return NodeValue::Any;
        };
        if values.all(|it| it == Some(first)) {
            first
        } else {
            NodeValue::Any
        }
    }
}

impl Display for TrapSpaceAttractor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let [state] = self.states.as_slice() {
            return write!(f, "{{{state}}}");
        }
        write!(f, "[")?;
        for (i, state) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{{{state}}}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::TrapSpaceAttractor;
    use crate::state::{NodeValue, PartialState};

    fn state(s: &str) -> PartialState {
        s.parse().unwrap()
    }

    #[test]
    fn test_extend_keeps_order() {
        let a = TrapSpaceAttractor::from(state("A=1,B=0"));
        let b = TrapSpaceAttractor::from(state("A=1,B=1"));
        let merged = a.extend(b);
        assert_eq!(merged.states(), &[state("A=1,B=0"), state("A=1,B=1")]);
        assert!(!merged.is_steady_state());
        assert_eq!(merged.covered_states(), 2);
    }

    #[test]
    fn test_projection_and_matching() {
        let cycle = TrapSpaceAttractor::from(state("A=1,B=0,C=*"))
            .extend(TrapSpaceAttractor::from(state("A=1,B=1,C=0")));
        assert_eq!(cycle.projection("A"), NodeValue::One);
        assert_eq!(cycle.projection("B"), NodeValue::Any);
        assert_eq!(cycle.projection("C"), NodeValue::Any);
        assert_eq!(cycle.projection("D"), NodeValue::Any);
        assert_eq!(cycle.covered_states(), 3);

        assert!(cycle.matches(&state("A=1")));
        assert!(cycle.matches(&state("B=1,C=0")));
        assert!(!cycle.matches(&state("B=1,C=1")));
        assert!(cycle.matches(&PartialState::new()));
    }

    #[test]
    fn test_empty_attractor_is_rejected() {
        assert!(TrapSpaceAttractor::from_states(Vec::new()).is_none());
    }
}
