use crate::CabeanError;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The value of one node in a [`PartialState`]. `Any` stands for "either value" and is
/// written as `*`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeValue {
    Zero,
    One,
    Any,
}

impl NodeValue {
    /// Returns `None` for [`NodeValue::Any`].
    pub fn try_as_bool(self) -> Option<bool> {
        match self {
            NodeValue::Zero => Some(false),
            NodeValue::One => Some(true),
            NodeValue::Any => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        self != NodeValue::Any
    }
}

impl From<bool> for NodeValue {
    fn from(value: bool) -> Self {
        if value {
            NodeValue::One
        } else {
            NodeValue::Zero
        }
    }
}

impl TryFrom<char> for NodeValue {
    type Error = char;

    /// Accepts `0`, `1`, and the two wildcard spellings `*` and `-`.
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '0' => Ok(NodeValue::Zero),
            '1' => Ok(NodeValue::One),
            '*' | '-' => Ok(NodeValue::Any),
            other => Err(other),
        }
    }
}

impl Display for NodeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeValue::Zero => write!(f, "0"),
            NodeValue::One => write!(f, "1"),
            NodeValue::Any => write!(f, "*"),
        }
    }
}

/// A mapping from node names to [`NodeValue`]s.
///
/// Partial states describe initial constraints, reprogramming targets and the states of
/// an attractor. Keys are kept sorted, so two structurally equal states always compare,
/// hash and print the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartialState(BTreeMap<String, NodeValue>);

impl PartialState {
    pub fn new() -> PartialState {
        PartialState(BTreeMap::new())
    }

    /// Set the value of `node`, returning the previous value (if any).
    pub fn set(&mut self, node: &str, value: NodeValue) -> Option<NodeValue> {
        self.0.insert(node.to_string(), value)
    }

    pub fn with(mut self, node: &str, value: NodeValue) -> PartialState {
        self.set(node, value);
        self
    }

    pub fn get(&self, node: &str) -> Option<NodeValue> {
        self.0.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, NodeValue> {
        self.0.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|it| it.as_str())
    }

    /// Iterate over the nodes that have a fixed (non-wildcard) value.
    pub fn fixed(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0
            .iter()
            .filter_map(|(node, value)| value.try_as_bool().map(|value| (node.as_str(), value)))
    }

    /// True if every fixed value of `spec` is also fixed to the same value in this state.
    pub fn agrees_with(&self, spec: &PartialState) -> bool {
        spec.fixed()
            .all(|(node, value)| self.get(node).and_then(NodeValue::try_as_bool) == Some(value))
    }

    /// True if the state assigns every node in `nodes` a concrete value.
    pub fn is_complete_over<'a>(&self, nodes: impl IntoIterator<Item = &'a str>) -> bool {
        nodes
            .into_iter()
            .all(|node| self.get(node).is_some_and(NodeValue::is_fixed))
    }
}

impl<S: Into<String>> FromIterator<(S, NodeValue)> for PartialState {
    fn from_iter<T: IntoIterator<Item = (S, NodeValue)>>(iter: T) -> Self {
        PartialState(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'a> IntoIterator for &'a PartialState {
    type Item = (&'a String, &'a NodeValue);
    type IntoIter = btree_map::Iter<'a, String, NodeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for PartialState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (node, value) in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{node}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for PartialState {
    type Err = CabeanError;

    /// Parse the `A=1,B=0,C=*` notation. Whitespace around items is ignored and an empty
    /// string is the empty (unconstrained) state.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = PartialState::new();
        for item in s.split(',').map(str::trim).filter(|it| !it.is_empty()) {
            let Some((node, value)) = item.split_once('=') else {
                return Err(CabeanError::InvalidState(s.to_string()));
            };
            let node = node.trim();
            let mut chars = value.trim().chars();
            let value = match (chars.next(), chars.next()) {
                (Some(c), None) => NodeValue::try_from(c).ok(),
                _ => None,
            };
            match value {
                Some(value) if !node.is_empty() => {
                    result.set(node, value);
                }
                _ => return Err(CabeanError::InvalidState(s.to_string())),
            }
        }
        Ok(result)
    }
}
