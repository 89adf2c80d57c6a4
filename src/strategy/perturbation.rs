use crate::control::{ControlSet, ControlValue, PerturbationKind};
use crate::state::NodeValue;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The value a perturbation imposes on one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerturbationValue {
    Fixed(bool),
    /// Drive the node away from its current value. Used when the node is flipped in a
    /// state (or attractor) where it has no single known value.
    Negated,
}

impl PerturbationValue {
    /// The value that flips a node currently observed as `current`.
    pub fn flip_of(current: NodeValue) -> PerturbationValue {
        match current.try_as_bool() {
            Some(value) => PerturbationValue::Fixed(!value),
            None => PerturbationValue::Negated,
        }
    }
}

impl Display for PerturbationValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PerturbationValue::Fixed(value) => write!(f, "{}", u8::from(*value)),
            PerturbationValue::Negated => write!(f, "!"),
        }
    }
}

/// One perturbation: the variable assignment together with its temporal kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Perturbation {
    pub kind: PerturbationKind,
    pub assignment: BTreeMap<String, PerturbationValue>,
}

impl Perturbation {
    /// Build a perturbation from a control set, resolving driver nodes without a value
    /// through `current`, which gives the value of a node where the control is applied.
    pub fn from_control<F>(kind: PerturbationKind, control: &ControlSet, current: F) -> Perturbation
    where
        F: Fn(&str) -> NodeValue,
    {
        let assignment = control
            .iter()
            .map(|(node, value)| {
                let value = match value {
                    ControlValue::Fixed(value) => PerturbationValue::Fixed(value),
                    ControlValue::Flip => PerturbationValue::flip_of(current(node)),
                };
                (node.to_string(), value)
            })
            .collect();
        Perturbation { kind, assignment }
    }
}

impl Display for Perturbation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, (node, value)) in self.assignment.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match value {
                PerturbationValue::Negated => write!(f, "!{node}")?,
                PerturbationValue::Fixed(_) => write!(f, "{node}={value}")?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::{Perturbation, PerturbationValue};
    use crate::control::{ControlSet, PerturbationKind};
    use crate::state::NodeValue;

    #[test]
    fn test_flip_resolution() {
        let control = ControlSet::parse("A B C=1").unwrap();
        let perturbation = Perturbation::from_control(PerturbationKind::Permanent, &control, |node| {
            match node {
                "A" => NodeValue::One,
                _ => NodeValue::Any,
            }
        });
        assert_eq!(perturbation.assignment["A"], PerturbationValue::Fixed(false));
        assert_eq!(perturbation.assignment["B"], PerturbationValue::Negated);
        assert_eq!(perturbation.assignment["C"], PerturbationValue::Fixed(true));
        assert_eq!(perturbation.to_string(), "permanent(A=0 !B C=1)");
    }
}
