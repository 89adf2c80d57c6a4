//! Typed control records extracted from the engine output.

use crate::state::PartialState;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The temporal kind of a perturbation.
///
/// Instantaneous perturbations flip values once, temporary perturbations hold them until
/// the network settles in the target basin, and permanent perturbations never release them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerturbationKind {
    Instantaneous,
    Temporary,
    Permanent,
}

impl PerturbationKind {
    /// The suffix used by the engine's `-control` codes (`OI`, `AST`, ...).
    pub fn code(self) -> char {
        match self {
            PerturbationKind::Instantaneous => 'I',
            PerturbationKind::Temporary => 'T',
            PerturbationKind::Permanent => 'P',
        }
    }

    /// The upper-case word used in the section banners of the engine output.
    pub fn banner_word(self) -> &'static str {
        match self {
            PerturbationKind::Instantaneous => "INSTANTANEOUS",
            PerturbationKind::Temporary => "TEMPORARY",
            PerturbationKind::Permanent => "PERMANENT",
        }
    }
}

impl Display for PerturbationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PerturbationKind::Instantaneous => "instantaneous",
            PerturbationKind::Temporary => "temporary",
            PerturbationKind::Permanent => "permanent",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PerturbationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i" | "instantaneous" => Ok(PerturbationKind::Instantaneous),
            "t" | "temporary" => Ok(PerturbationKind::Temporary),
            "p" | "permanent" => Ok(PerturbationKind::Permanent),
            _ => Err(format!("Unknown perturbation kind `{s}`.")),
        }
    }
}

/// One entry of a [`ControlSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlValue {
    /// The node is forced to the given value (`A=1`).
    Fixed(bool),
    /// The node is listed as a driver without a value and has to be flipped relative
    /// to the attractor in which the control is applied.
    Flip,
}

/// The variables one perturbation must fix, for one (source, target) pair and one
/// alternative solution.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlSet(BTreeMap<String, ControlValue>);

impl ControlSet {
    /// Parse a whitespace separated list of `node=value` tokens. Bare node names are
    /// accepted as [`ControlValue::Flip`]. Returns `None` for malformed tokens.
    pub fn parse(data: &str) -> Option<ControlSet> {
        let mut result = BTreeMap::new();
        for token in data.split_whitespace() {
            let token = token.trim_end_matches(',');
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                None => {
                    result.insert(token.to_string(), ControlValue::Flip);
                }
                Some((node, value)) if !node.is_empty() => {
                    let value = match value {
                        "0" => false,
                        "1" => true,
                        _ => return None,
                    };
                    result.insert(node.to_string(), ControlValue::Fixed(value));
                }
                Some(_) => return None,
            }
        }
        Some(ControlSet(result))
    }

    pub fn get(&self, node: &str) -> Option<ControlValue> {
        self.0.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ControlValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ControlSet {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        ControlSet(
            iter.into_iter()
                .map(|(k, v)| (k.into(), ControlValue::Fixed(v)))
                .collect(),
        )
    }
}

impl Display for ControlSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let items = self
            .0
            .iter()
            .map(|(node, value)| match value {
                ControlValue::Fixed(value) => format!("{node}={}", u8::from(*value)),
                ControlValue::Flip => node.clone(),
            })
            .collect::<Vec<_>>();
        write!(f, "{}", items.join(" "))
    }
}

/// A path of perturbations applied attractor by attractor, in execution order: each
/// item is the (0-based) attractor in which the control set is applied.
pub type ControlSequence = Vec<(usize, ControlSet)>;

/// One-step control solutions keyed by (source, target) attractor indices.
pub type OneStepControls = BTreeMap<(usize, usize), Vec<ControlSet>>;

/// Attractor-sequential solutions keyed by (source, target) attractor indices.
pub type SequentialControls = BTreeMap<(usize, usize), Vec<ControlSequence>>;

/// One hop of a state-based sequential control path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    /// The state in which the perturbation is applied.
    pub from: PartialState,
    /// Nodes whose value is flipped.
    pub flip: BTreeSet<String>,
}

/// The result of path-based sequential control.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequentialPaths {
    /// One list of alternative steps per hop; complete paths are the Cartesian product.
    Combinatorial(Vec<Vec<PathStep>>),
    /// A list of complete paths, each a list of steps in execution order.
    Enumerated(Vec<Vec<PathStep>>),
}

impl SequentialPaths {
    /// Number of complete paths described by this result (saturating).
    pub fn count(&self) -> usize {
        match self {
            SequentialPaths::Combinatorial(hops) if hops.is_empty() => 0,
            SequentialPaths::Combinatorial(hops) => hops
                .iter()
                .fold(1usize, |acc, it| acc.saturating_mul(it.len())),
            SequentialPaths::Enumerated(paths) => paths.len(),
        }
    }
}
